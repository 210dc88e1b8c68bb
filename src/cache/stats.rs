//! Cache statistics and management
//!
//! This module provides functions for listing, clearing, and getting
//! statistics about cached repositories.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::entry::EntryMeta;
use super::paths::{ENTRY_FILE, VCS_DIR};
use super::permissions::make_removable;
use crate::error::{Result, cache};

/// Cached repository information, aggregated across refs
#[derive(Debug, Clone)]
pub struct CachedRepository {
    /// Source URL, or the directory digest when no entry records it
    pub url: String,
    /// Cached refs, sorted
    pub refs: Vec<String>,
    /// Total size in bytes
    pub size: u64,
}

impl CachedRepository {
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of cached repositories (by URL)
    pub repositories: usize,
    /// Number of cached refs across all repositories
    pub versions: usize,
    /// Total size in bytes
    pub total_size: u64,
}

impl CacheStats {
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Format a byte count as a human-readable string
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

/// List all cached repositories under `root`
pub fn list_cached(root: &Path) -> Result<Vec<CachedRepository>> {
    let mut repositories = Vec::new();

    for repo_dir in subdirectories(root)? {
        let entries = find_entries(&repo_dir);
        if entries.is_empty() {
            continue;
        }

        let mut url = None;
        let mut refs = Vec::new();
        let mut size = 0;
        for entry in &entries {
            if let Ok(Some(meta)) = EntryMeta::load(entry) {
                url.get_or_insert(meta.url);
                refs.push(meta.git_ref);
            } else if let Ok(relative) = entry.strip_prefix(&repo_dir) {
                refs.push(relative.to_string_lossy().replace('\\', "/"));
            }
            size += dir_size(entry).unwrap_or(0);
        }
        refs.sort();

        let url = url.unwrap_or_else(|| {
            repo_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        });
        repositories.push(CachedRepository { url, refs, size });
    }

    repositories.sort_by(|a, b| a.url.cmp(&b.url));
    Ok(repositories)
}

/// Get cache statistics for `root`
pub fn cache_stats(root: &Path) -> Result<CacheStats> {
    let repositories = list_cached(root)?;
    Ok(CacheStats {
        repositories: repositories.len(),
        versions: repositories.iter().map(|r| r.refs.len()).sum(),
        total_size: repositories.iter().map(|r| r.size).sum(),
    })
}

/// Remove everything under `root`, returning the number of bytes freed
pub fn clear_cache(root: &Path) -> Result<u64> {
    if !root.exists() {
        return Ok(0);
    }

    let freed = dir_size(root)?;
    make_removable(root)?;
    fs::remove_dir_all(root).map_err(|e| {
        cache::operation_failed(format!("Failed to clear cache {}: {}", root.display(), e))
    })?;
    Ok(freed)
}

fn subdirectories(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)
        .map_err(|e| cache::operation_failed(format!("Failed to read cache directory: {e}")))?
    {
        let entry =
            entry.map_err(|e| cache::operation_failed(format!("Failed to read entry: {e}")))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

/// Cache entries below a repository directory; refs containing `/` nest deeper
fn find_entries(repo_dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(repo_dir).min_depth(1).into_iter();

    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if path.join(ENTRY_FILE).is_file() || path.join(VCS_DIR).exists() {
            found.push(path.to_path_buf());
            walker.skip_current_dir();
        }
    }
    found
}

/// Calculate directory size recursively
fn dir_size(path: &Path) -> Result<u64> {
    let mut size = 0u64;
    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        if entry.file_type().is_file() {
            size += entry
                .metadata()
                .map_err(|e| cache::operation_failed(format!("Failed to get metadata: {e}")))?
                .len();
        }
    }
    Ok(size)
}
