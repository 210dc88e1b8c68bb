//! Local source overrides
//!
//! An override replaces the fetched sources of a package URL with a local
//! directory. The table comes from a single string of the form
//! `url^path;url^path`; entries that do not split into exactly one key and one
//! value are skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Separates override entries
pub const ENTRY_SEPARATOR: char = ';';

/// Separates the source URL from the local path within an entry
pub const PAIR_SEPARATOR: char = '^';

/// Read-only map from source URL to a local directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    entries: HashMap<String, PathBuf>,
}

impl OverrideMap {
    /// Parse an override table. Never fails; malformed entries are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut entries = HashMap::new();

        for entry in raw.split(ENTRY_SEPARATOR) {
            let pair: Vec<&str> = entry.split(PAIR_SEPARATOR).collect();
            if let [url, path] = pair.as_slice() {
                entries.insert((*url).to_string(), PathBuf::from(path));
            } else if !entry.is_empty() {
                warn!("Ignoring malformed source override entry: {}", entry);
            }
        }

        Self { entries }
    }

    /// Local directory substituted for `url`, if any
    pub fn get(&self, url: &str) -> Option<&Path> {
        self.entries.get(url).map(PathBuf::as_path)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(url, path)| (url.as_str(), path.as_path()))
    }
}
