//! Source cache
//!
//! Owns every directory under the cache root. One entry holds one ref of one
//! repository:
//!
//! - missing entries are cloned (when cloning is allowed),
//! - mutable entries (branches) are fast-forwarded on reuse (when pulling is allowed),
//! - immutable entries (tags) are reused as they are.
//!
//! Each fetch holds the entry's lock from start to finish. Any failure while
//! cloning or pulling removes the entry before the lock is released, so the
//! next fetch starts from a clean clone instead of a half-written tree.

pub mod entry;
pub mod lock;
pub mod paths;
pub mod permissions;
pub mod stats;

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

pub use entry::{EntryKind, EntryMeta};
pub use lock::{EntryLocker, LockMode};
pub use stats::{CacheStats, CachedRepository};

use crate::config::Config;
use crate::error::{Result, cache, fetch};
use crate::git;
use crate::oracle::{GitRemote, RefSource, VersionOracle};

/// What a fetch is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Fast-forward mutable entries that already exist
    pub allow_pull: bool,
    /// Clone entries that do not exist yet
    pub allow_clone: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            allow_pull: true,
            allow_clone: true,
        }
    }
}

/// What a fetch did to the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Cloned,
    Pulled,
    Reused,
}

/// A cache entry ready for use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSource {
    pub path: PathBuf,
    pub git_ref: String,
    pub outcome: FetchOutcome,
}

pub struct SourceCache<S = GitRemote> {
    root: PathBuf,
    oracle: VersionOracle<S>,
    locker: Box<dyn EntryLocker>,
}

impl SourceCache<GitRemote> {
    pub fn from_config(config: &Config) -> Self {
        let locker = config.lock_mode().locker();
        if locker.is_degraded() {
            warn!("Cache locking is disabled; concurrent qdep runs may corrupt the cache");
        }
        Self::new(
            config.cache_root(),
            VersionOracle::git(config.version_ordering()),
            locker,
        )
    }
}

impl<S: RefSource> SourceCache<S> {
    pub fn new(root: impl Into<PathBuf>, oracle: VersionOracle<S>, locker: Box<dyn EntryLocker>) -> Self {
        Self {
            root: root.into(),
            oracle,
            locker,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn oracle(&self) -> &VersionOracle<S> {
        &self.oracle
    }

    /// Directory of the entry for `url` at `git_ref`
    pub fn entry_path(&self, url: &str, git_ref: &str) -> PathBuf {
        paths::entry_dir(&self.root, url, git_ref)
    }

    /// Make the sources of `url` at `git_ref` available in the cache.
    ///
    /// Without a ref the latest tag is used; a source without tags fails with
    /// `NoVersionAvailable`.
    pub fn fetch(&self, url: &str, git_ref: Option<&str>, policy: FetchPolicy) -> Result<FetchedSource> {
        let git_ref = match git_ref {
            Some(git_ref) => git_ref.to_string(),
            None => self
                .oracle
                .latest(url, true)?
                .ok_or_else(|| fetch::no_version_available(url))?,
        };
        check_ref_name(url, &git_ref)?;

        let entry = self.entry_path(url, &git_ref);
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cache::operation_failed(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let _guard = self.locker.acquire(&entry)?;
        let outcome = match populate(&entry, url, &git_ref, policy) {
            Ok(outcome) => outcome,
            Err(err) => {
                rollback(&entry);
                return Err(err);
            }
        };

        Ok(FetchedSource {
            path: entry,
            git_ref,
            outcome,
        })
    }

    pub fn list(&self) -> Result<Vec<CachedRepository>> {
        stats::list_cached(&self.root)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        stats::cache_stats(&self.root)
    }

    /// Remove the whole cache, returning the number of bytes freed
    pub fn clear(&self) -> Result<u64> {
        stats::clear_cache(&self.root)
    }
}

fn populate(entry: &Path, url: &str, git_ref: &str, policy: FetchPolicy) -> Result<FetchOutcome> {
    if is_populated(entry) {
        let meta = EntryMeta::load_or_infer(entry, url, git_ref)?;
        if meta.kind == EntryKind::Plain || meta.immutable || !policy.allow_pull {
            debug!("Reusing cached {}@{} at {}", url, git_ref, entry.display());
            return Ok(FetchOutcome::Reused);
        }

        info!("Pulling {}@{}", url, git_ref);
        permissions::make_writable(entry)?;
        git::pull_fast_forward(entry, url, git_ref)?;
        permissions::make_read_only(entry)?;
        return Ok(FetchOutcome::Pulled);
    }

    if !policy.allow_clone {
        return Err(fetch::clone_disabled(url));
    }

    info!("Cloning {}@{}", url, git_ref);
    let head = git::clone_ref(url, git_ref, entry)?;
    let immutable = !head.is_branch();
    EntryMeta::checkout(url, git_ref, immutable).store(entry)?;
    permissions::make_read_only(entry)?;
    Ok(FetchOutcome::Cloned)
}

/// Refs become cache path components, so only names git accepts for a branch are allowed
fn check_ref_name(url: &str, git_ref: &str) -> Result<()> {
    let plain = Path::new(git_ref)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if plain && git2::Reference::is_valid_name(&format!("refs/heads/{git_ref}")) {
        Ok(())
    } else {
        Err(fetch::fetch_failed(url, git_ref, "not a valid git ref name"))
    }
}

/// An entry counts as present once it has any content
fn is_populated(entry: &Path) -> bool {
    fs::read_dir(entry).is_ok_and(|mut contents| contents.next().is_some())
}

fn rollback(entry: &Path) {
    if !entry.exists() {
        return;
    }
    warn!("Removing incomplete cache entry {}", entry.display());
    let removed = permissions::make_removable(entry).and_then(|()| {
        fs::remove_dir_all(entry).map_err(|e| {
            cache::operation_failed(format!("Failed to remove {}: {}", entry.display(), e))
        })
    });
    if let Err(err) = removed {
        warn!("{}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QdepError;
    use crate::git::test_repo::SourceRepo;
    use crate::oracle::VersionOrdering;
    use tempfile::TempDir;

    fn source_cache(root: &Path) -> SourceCache {
        SourceCache::new(
            root,
            VersionOracle::git(VersionOrdering::Lexicographic),
            LockMode::Advisory.locker(),
        )
    }

    fn tagged_source() -> SourceRepo {
        let source = SourceRepo::new();
        source.commit_file("widgets.pri", "v1\n");
        source.tag("1.0.0");
        source.commit_file("widgets.pri", "v2\n");
        source.tag("1.1.0");
        source
    }

    #[test]
    fn test_fetch_without_ref_uses_latest_tag() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());

        let fetched = cache.fetch(&source.url(), None, FetchPolicy::default()).unwrap();

        assert_eq!(fetched.git_ref, "1.1.0");
        assert_eq!(fetched.outcome, FetchOutcome::Cloned);
        assert_eq!(fetched.path, cache.entry_path(&source.url(), "1.1.0"));
        let meta = EntryMeta::load(&fetched.path).unwrap().unwrap();
        assert!(meta.immutable);
    }

    #[test]
    fn test_fetch_twice_reuses_entry() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());

        let first = cache.fetch(&source.url(), Some("1.0.0"), FetchPolicy::default()).unwrap();
        let second = cache.fetch(&source.url(), Some("1.0.0"), FetchPolicy::default()).unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(second.outcome, FetchOutcome::Reused);
    }

    #[test]
    fn test_fetch_branch_pulls_on_reuse() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());

        let first = cache.fetch(&source.url(), Some("main"), FetchPolicy::default()).unwrap();
        assert!(!EntryMeta::load(&first.path).unwrap().unwrap().immutable);

        source.commit_file("widgets.pri", "v3\n");
        let second = cache.fetch(&source.url(), Some("main"), FetchPolicy::default()).unwrap();

        assert_eq!(second.outcome, FetchOutcome::Pulled);
        let content = fs::read_to_string(second.path.join("widgets.pri")).unwrap();
        assert_eq!(content, "v3\n");
    }

    #[test]
    fn test_fetch_without_pull_keeps_branch_as_is() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());
        cache.fetch(&source.url(), Some("main"), FetchPolicy::default()).unwrap();

        source.commit_file("widgets.pri", "v3\n");
        let policy = FetchPolicy {
            allow_pull: false,
            allow_clone: true,
        };
        let fetched = cache.fetch(&source.url(), Some("main"), policy).unwrap();

        assert_eq!(fetched.outcome, FetchOutcome::Reused);
        let content = fs::read_to_string(fetched.path.join("widgets.pri")).unwrap();
        assert_eq!(content, "v2\n");
    }

    #[test]
    fn test_clone_disabled() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());
        let policy = FetchPolicy {
            allow_pull: true,
            allow_clone: false,
        };

        let err = cache.fetch(&source.url(), Some("1.0.0"), policy).unwrap_err();

        assert!(matches!(err, QdepError::CloneDisabled { .. }));
        assert!(!cache.entry_path(&source.url(), "1.0.0").exists());
    }

    #[test]
    fn test_no_version_available() {
        let source = SourceRepo::new();
        source.commit_file("widgets.pri", "v1\n");
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());

        let err = cache.fetch(&source.url(), None, FetchPolicy::default()).unwrap_err();
        assert!(matches!(err, QdepError::NoVersionAvailable { .. }));
    }

    #[test]
    fn test_failed_clone_leaves_no_residue() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());

        let err = cache
            .fetch(&source.url(), Some("9.9.9"), FetchPolicy::default())
            .unwrap_err();

        assert!(matches!(err, QdepError::FetchFailed { .. }));
        assert!(!cache.entry_path(&source.url(), "9.9.9").exists());

        source.tag("9.9.9");
        let fetched = cache
            .fetch(&source.url(), Some("9.9.9"), FetchPolicy::default())
            .unwrap();
        assert_eq!(fetched.outcome, FetchOutcome::Cloned);
    }

    #[test]
    fn test_failed_pull_leaves_no_residue() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());
        let entry = cache.entry_path(&source.url(), "main");
        cache.fetch(&source.url(), Some("main"), FetchPolicy::default()).unwrap();

        source.rewrite_branch("main", "widgets.pri", "rewritten\n");
        let err = cache
            .fetch(&source.url(), Some("main"), FetchPolicy::default())
            .unwrap_err();

        assert!(matches!(err, QdepError::FetchFailed { .. }));
        assert!(!entry.exists());

        let fetched = cache
            .fetch(&source.url(), Some("main"), FetchPolicy::default())
            .unwrap();
        assert_eq!(fetched.outcome, FetchOutcome::Cloned);
        let content = fs::read_to_string(fetched.path.join("widgets.pri")).unwrap();
        assert_eq!(content, "rewritten\n");
    }

    #[test]
    fn test_fetch_side_branch_is_mutable() {
        let source = tagged_source();
        source.branch("stable");
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());

        let fetched = cache.fetch(&source.url(), Some("stable"), FetchPolicy::default()).unwrap();

        assert_eq!(fetched.outcome, FetchOutcome::Cloned);
        assert!(!EntryMeta::load(&fetched.path).unwrap().unwrap().immutable);
    }

    #[test]
    fn test_dot_refs_never_reach_the_cache_root() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());
        cache.fetch(&source.url(), Some("1.0.0"), FetchPolicy::default()).unwrap();

        for git_ref in ["..", ".", "../..", "a/../b", "/abs", ""] {
            let err = cache
                .fetch(&source.url(), Some(git_ref), FetchPolicy::default())
                .unwrap_err();
            assert!(
                matches!(err, QdepError::FetchFailed { .. }),
                "{git_ref:?} was accepted"
            );
        }

        assert!(cache.entry_path(&source.url(), "1.0.0").join("widgets.pri").is_file());
        assert_eq!(cache.stats().unwrap().versions, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_fetched_files_are_read_only() {
        use std::os::unix::fs::PermissionsExt;

        let source = tagged_source();
        source.commit_file("src/widgets.cpp", "int x;\n");
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());

        let fetched = cache.fetch(&source.url(), Some("main"), FetchPolicy::default()).unwrap();

        for file in ["widgets.pri", "src/widgets.cpp"] {
            let mode = fs::metadata(fetched.path.join(file)).unwrap().permissions().mode();
            assert_eq!(mode & 0o222, 0, "{file} is still writable");
        }
        let head = fs::metadata(fetched.path.join(".git").join("HEAD")).unwrap();
        assert_ne!(head.permissions().mode() & 0o200, 0);
    }

    #[test]
    fn test_concurrent_fetches_share_one_clone() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(temp.path());
        let url = source.url();
        let policy = FetchPolicy {
            allow_pull: false,
            allow_clone: true,
        };

        let outcomes: Vec<FetchOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| scope.spawn(|| cache.fetch(&url, Some("1.0.0"), policy).unwrap().outcome))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(outcomes.iter().filter(|o| **o == FetchOutcome::Cloned).count(), 1);
        assert_eq!(outcomes.iter().filter(|o| **o == FetchOutcome::Reused).count(), 1);
        let content = fs::read_to_string(cache.entry_path(&url, "1.0.0").join("widgets.pri")).unwrap();
        assert_eq!(content, "v1\n");
    }

    #[test]
    fn test_clear_removes_read_only_entries() {
        let source = tagged_source();
        let temp = TempDir::new().unwrap();
        let cache = source_cache(&temp.path().join("cache"));
        cache.fetch(&source.url(), Some("1.0.0"), FetchPolicy::default()).unwrap();

        assert_eq!(cache.stats().unwrap().versions, 1);
        assert!(cache.clear().unwrap() > 0);
        assert!(!cache.root().exists());
    }
}
