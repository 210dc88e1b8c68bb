//! Cross-process locking of cache entries
//!
//! Locking is a capability handed to the cache rather than something it does
//! implicitly. [`LockMode::Advisory`] takes an OS file lock on `<entry>.lock`;
//! [`LockMode::Disabled`] is the degraded mode for filesystems without lock
//! support, where concurrent invocations may race on the same entry.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fslock::LockFile;
use tracing::debug;

use super::paths::lock_path;
use crate::error::{QdepError, Result, cache};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockMode {
    #[default]
    Advisory,
    Disabled,
}

impl LockMode {
    /// The locker implementing this mode
    pub fn locker(self) -> Box<dyn EntryLocker> {
        match self {
            LockMode::Advisory => Box::new(FileLocker),
            LockMode::Disabled => Box::new(NoopLocker),
        }
    }
}

impl FromStr for LockMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(LockMode::Advisory),
            "disabled" => Ok(LockMode::Disabled),
            other => Err(format!(
                "unknown lock mode '{other}' (expected 'advisory' or 'disabled')"
            )),
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Advisory => f.write_str("advisory"),
            LockMode::Disabled => f.write_str("disabled"),
        }
    }
}

/// Acquires exclusive access to one cache entry
pub trait EntryLocker: Send + Sync {
    /// Block until `entry` is exclusively held; released when the guard drops
    fn acquire(&self, entry: &Path) -> Result<EntryGuard>;

    /// Whether this locker provides no mutual exclusion
    fn is_degraded(&self) -> bool {
        false
    }
}

/// Held lock on a cache entry
#[derive(Debug)]
pub struct EntryGuard {
    lock: Option<LockFile>,
    lock_path: PathBuf,
}

impl EntryGuard {
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.as_mut() {
            let _ = lock.unlock();
            debug!("Released {}", self.lock_path.display());
        }
    }
}

fn lock_failed(path: &Path, reason: impl fmt::Display) -> QdepError {
    cache::lock_failed(path.display().to_string(), reason.to_string())
}

/// Blocking OS file lock on `<entry>.lock`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLocker;

impl EntryLocker for FileLocker {
    fn acquire(&self, entry: &Path) -> Result<EntryGuard> {
        let lock_path = lock_path(entry);

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| lock_failed(&lock_path, e))?;
        }
        let mut lock = LockFile::open(&lock_path).map_err(|e| lock_failed(&lock_path, e))?;
        debug!("Waiting for {}", lock_path.display());
        lock.lock().map_err(|e| lock_failed(&lock_path, e))?;
        debug!("Acquired {}", lock_path.display());

        Ok(EntryGuard {
            lock: Some(lock),
            lock_path,
        })
    }
}

/// No locking at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLocker;

impl EntryLocker for NoopLocker {
    fn acquire(&self, entry: &Path) -> Result<EntryGuard> {
        debug!("Skipping lock for {}", entry.display());
        Ok(EntryGuard {
            lock: None,
            lock_path: lock_path(entry),
        })
    }

    fn is_degraded(&self) -> bool {
        true
    }
}
