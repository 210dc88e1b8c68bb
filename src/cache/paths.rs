//! Cache layout
//!
//! ```text
//! <root>/<sha3-256(url)>/<ref>/            checkout of one ref
//! <root>/<sha3-256(url)>/<ref>/.qdep_entry.json
//! <root>/<sha3-256(url)>/<ref>.lock        cross-process lock for the entry
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::identity::url_digest;

/// Sidecar describing a cache entry
pub const ENTRY_FILE: &str = ".qdep_entry.json";

/// Version-control metadata directory inside a checkout
pub const VCS_DIR: &str = ".git";

const LOCK_SUFFIX: &str = ".lock";

/// Directory holding every cached ref of `url`
pub fn repository_dir(root: &Path, url: &str) -> PathBuf {
    root.join(url_digest(url))
}

/// Directory of the cache entry for `url` at `git_ref`
pub fn entry_dir(root: &Path, url: &str, git_ref: &str) -> PathBuf {
    repository_dir(root, url).join(git_ref)
}

/// Lock file guarding `entry`; lives beside the entry so removing the entry keeps the lock
pub fn lock_path(entry: &Path) -> PathBuf {
    let mut name = OsString::from(entry.as_os_str());
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}
