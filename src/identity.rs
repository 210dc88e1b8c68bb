//! Package identifiers
//!
//! An identifier is derived from the source URL and the subpath only, never the
//! ref, so two requests for the same package at different versions collide on
//! purpose. The concatenation `url + subpath` is lowercased before hashing:
//! `https://github.com/Acme/Widgets.git` and `https://github.com/acme/widgets.git`
//! name the same package.

use std::fmt;

use sha3::{Digest, Sha3_256};

/// Textual prefix of every identifier; keeps it a valid build-system variable name
pub const IDENTIFIER_PREFIX: &str = "__QDEP_PKG_";

/// Stable deduplication key for one package + subpath
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(String);

impl PackageId {
    /// Derive the identifier of `url` + `sub_path`
    pub fn derive(url: &str, sub_path: &str) -> Self {
        let normalized = format!("{url}{sub_path}").to_lowercase();
        let digest = Sha3_256::digest(normalized.as_bytes());
        Self(format!("{IDENTIFIER_PREFIX}{}", hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex SHA3-256 of a source URL, used as the per-repository cache directory name
pub fn url_digest(url: &str) -> String {
    hex::encode(Sha3_256::digest(url.as_bytes()))
}
