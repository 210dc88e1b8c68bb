//! Cache entry sidecar
//!
//! Every entry carries a small JSON record saying where it came from and
//! whether it may ever change. Entries written by older tools have no record;
//! for those the facts are read back from the checkout itself.

use std::fs;
use std::path::Path;

use git2::Repository;
use serde::{Deserialize, Serialize};

use super::paths::{ENTRY_FILE, VCS_DIR};
use crate::error::{QdepError, Result, cache};
use crate::git::refs::head_branch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A live git checkout
    Checkout,
    /// A plain tree without version-control metadata
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub url: String,
    pub git_ref: String,
    /// Never pull: the ref is a tag or otherwise detached
    pub immutable: bool,
    pub kind: EntryKind,
}

impl EntryMeta {
    pub fn checkout(url: &str, git_ref: &str, immutable: bool) -> Self {
        Self {
            url: url.to_string(),
            git_ref: git_ref.to_string(),
            immutable,
            kind: EntryKind::Checkout,
        }
    }

    /// Read the sidecar of `entry`, if present
    pub fn load(entry: &Path) -> Result<Option<Self>> {
        let path = entry.join(ENTRY_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let meta = serde_json::from_str(&content).map_err(|e| {
            cache::operation_failed(format!("Invalid cache entry record {}: {}", path.display(), e))
        })?;
        Ok(Some(meta))
    }

    /// The sidecar of `entry`, or what can be told from its contents when there is none
    pub fn load_or_infer(entry: &Path, url: &str, git_ref: &str) -> Result<Self> {
        if let Some(meta) = Self::load(entry)? {
            return Ok(meta);
        }

        if !entry.join(VCS_DIR).exists() {
            return Ok(Self {
                kind: EntryKind::Plain,
                ..Self::checkout(url, git_ref, true)
            });
        }

        let immutable = Repository::open(entry)
            .and_then(|repo| head_branch(&repo))
            .map_err(|e| QdepError::CacheOperationFailed {
                message: format!("Cannot inspect cached checkout {}: {}", entry.display(), e.message()),
            })?
            .is_none();
        Ok(Self::checkout(url, git_ref, immutable))
    }

    pub fn store(&self, entry: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            cache::operation_failed(format!("Failed to serialize cache entry record: {e}"))
        })?;
        fs::write(entry.join(ENTRY_FILE), content)?;
        Ok(())
    }
}
