//! Runtime configuration for qdep
//!
//! All operator knobs are collected here once, at the program boundary, and the
//! resulting [`Config`] is passed by reference into the core. Nothing below this
//! module reads the process environment.
//!
//! | Variable                 | Meaning                                          |
//! |--------------------------|--------------------------------------------------|
//! | `QDEP_CACHE_DIR`         | cache root (default: user cache dir + `qdep`)    |
//! | `QDEP_SOURCE_OVERRIDE`   | `url^path;url^path` local source substitutions  |
//! | `QDEP_DEFAULT_PKG_FN`    | template for `owner/repo` expansion, `{}` marker |
//! | `QDEP_VERSION_ORDERING`  | `lexicographic` (default) or `semver`            |
//! | `QDEP_LOCK_MODE`         | `advisory` (default) or `disabled`               |

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

use crate::cache::lock::LockMode;
use crate::error::{QdepError, Result};
use crate::oracle::VersionOrdering;
use crate::overrides::OverrideMap;

pub const CACHE_DIR_ENV: &str = "QDEP_CACHE_DIR";
pub const SOURCE_OVERRIDE_ENV: &str = "QDEP_SOURCE_OVERRIDE";
pub const URL_TEMPLATE_ENV: &str = "QDEP_DEFAULT_PKG_FN";
pub const VERSION_ORDERING_ENV: &str = "QDEP_VERSION_ORDERING";
pub const LOCK_MODE_ENV: &str = "QDEP_LOCK_MODE";

/// Default template used to expand `owner/repo` shorthands
pub const DEFAULT_URL_TEMPLATE: &str = "https://github.com/{}.git";

/// Placeholder replaced by `owner/repo` in the URL template
pub const URL_TEMPLATE_MARKER: &str = "{}";

/// Default cache directory name under the user's cache directory
const CACHE_DIR: &str = "qdep";

#[derive(Debug)]
pub struct Config {
    cache_root: PathBuf,
    url_template: String,
    version_ordering: VersionOrdering,
    lock_mode: LockMode,
    source_overrides: Option<String>,
    overrides: OnceLock<OverrideMap>,
}

impl Config {
    /// Create a configuration with defaults for everything but the cache root
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            version_ordering: VersionOrdering::default(),
            lock_mode: LockMode::default(),
            source_overrides: None,
            overrides: OnceLock::new(),
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// Intended for library consumers; the CLI goes through clap's `env` fallbacks instead.
    pub fn from_env() -> Result<Self> {
        let cache_root = match std::env::var_os(CACHE_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_cache_root()?,
        };

        let mut config = Self::new(cache_root);

        if let Ok(raw) = std::env::var(SOURCE_OVERRIDE_ENV) {
            config = config.with_source_overrides(raw);
        }
        if let Ok(template) = std::env::var(URL_TEMPLATE_ENV) {
            config = config.with_url_template(template)?;
        }
        if let Ok(ordering) = std::env::var(VERSION_ORDERING_ENV) {
            let ordering = ordering
                .parse()
                .map_err(|message| QdepError::ConfigInvalid { message })?;
            config = config.with_version_ordering(ordering);
        }
        if let Ok(mode) = std::env::var(LOCK_MODE_ENV) {
            let mode = mode
                .parse()
                .map_err(|message| QdepError::ConfigInvalid { message })?;
            config = config.with_lock_mode(mode);
        }

        Ok(config)
    }

    /// Set the raw override table (`url^path;url^path`), parsed on first use
    #[must_use]
    pub fn with_source_overrides(mut self, raw: impl Into<String>) -> Self {
        self.source_overrides = Some(raw.into());
        self.overrides = OnceLock::new();
        self
    }

    /// Set the shorthand expansion template; it must contain the `{}` marker
    pub fn with_url_template(mut self, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(URL_TEMPLATE_MARKER) {
            return Err(QdepError::ConfigInvalid {
                message: format!(
                    "URL template '{template}' does not contain the '{URL_TEMPLATE_MARKER}' placeholder"
                ),
            });
        }
        self.url_template = template;
        Ok(self)
    }

    #[must_use]
    pub fn with_version_ordering(mut self, ordering: VersionOrdering) -> Self {
        self.version_ordering = ordering;
        self
    }

    #[must_use]
    pub fn with_lock_mode(mut self, mode: LockMode) -> Self {
        self.lock_mode = mode;
        self
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn version_ordering(&self) -> VersionOrdering {
        self.version_ordering
    }

    pub fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }

    /// The process-wide override table, built on first access and never mutated afterwards
    pub fn overrides(&self) -> &OverrideMap {
        self.overrides.get_or_init(|| match &self.source_overrides {
            Some(raw) => {
                let map = OverrideMap::parse(raw);
                for (url, path) in map.iter() {
                    debug!("Source override: {} -> {}", url, path.display());
                }
                map
            }
            None => OverrideMap::default(),
        })
    }

    /// Return the cache root, creating it (and its parents) if needed
    pub fn ensure_cache_root(&self) -> Result<&Path> {
        fs::create_dir_all(&self.cache_root).map_err(|e| QdepError::CacheOperationFailed {
            message: format!(
                "Failed to create cache directory {}: {}",
                self.cache_root.display(),
                e
            ),
        })?;
        Ok(&self.cache_root)
    }
}

/// Get the default cache directory path
///
/// Uses the platform's standard cache location (e.g. XDG on Linux, Library/Caches on macOS)
/// with a `qdep` subdirectory.
pub fn default_cache_root() -> Result<PathBuf> {
    let base = dirs::cache_dir().ok_or_else(|| QdepError::CacheOperationFailed {
        message: "Could not determine cache directory".to_string(),
    })?;

    Ok(base.join(CACHE_DIR))
}
