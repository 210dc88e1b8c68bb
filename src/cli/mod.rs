//! CLI definitions using clap derive API
//!
//! Global options map one-to-one onto [`Config`] and fall back to the
//! `QDEP_*` environment variables. Each command's arguments live in their own
//! submodule.

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::cache::LockMode;
use crate::config::{Config, default_cache_root};
use crate::error::Result;
use crate::oracle::VersionOrdering;

pub mod cache;
pub mod completions;
pub mod dephash;
pub mod get;
pub mod pkgresolve;
pub mod query;
pub mod update;
pub mod versions;

pub use cache::{CacheArgs, CacheSubcommand, ClearCacheArgs};
pub use completions::CompletionsArgs;
pub use dephash::DephashArgs;
pub use get::GetArgs;
pub use pkgresolve::PkgresolveArgs;
pub use query::QueryArgs;
pub use update::UpdateArgs;
pub use versions::VersionsArgs;

/// qdep - source resolution and caching for qmake package dependencies
#[derive(Parser, Debug)]
#[command(
    name = "qdep",
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Source resolution and caching for qmake package dependencies",
    long_about = "qdep resolves package descriptors (owner/repo[@ref[/sub/path.pri]]) to local, \
                  read-only source trees kept in a per-user cache, pinned to a tag or branch.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  qdep versions acme/widgets               \x1b[90m# List released versions\x1b[0m\n   \
                  qdep query acme/widgets@1.2.0            \x1b[90m# Show what a descriptor expands to\x1b[0m\n   \
                  qdep get acme/widgets acme/gadgets@2.0.0 \x1b[90m# Download sources into the cache\x1b[0m\n   \
                  qdep update acme/widgets@1.0.0           \x1b[90m# Check pinned tags for newer ones\x1b[0m\n   \
                  qdep cache                               \x1b[90m# Show cache statistics\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Cache directory (defaults to the user cache directory)
    #[arg(long, short = 'd', global = true, env = "QDEP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Local source substitutions, as url^path pairs separated by ';'
    #[arg(long, global = true, env = "QDEP_SOURCE_OVERRIDE")]
    pub source_override: Option<String>,

    /// Template for owner/repo shorthands; '{}' is replaced by owner/repo
    #[arg(long, global = true, env = "QDEP_DEFAULT_PKG_FN")]
    pub url_template: Option<String>,

    /// How tags are ordered to find the latest one (lexicographic, semver)
    #[arg(
        long,
        global = true,
        env = "QDEP_VERSION_ORDERING",
        default_value_t = VersionOrdering::default()
    )]
    pub version_ordering: VersionOrdering,

    /// Cross-process locking of cache entries (advisory, disabled)
    #[arg(
        long,
        global = true,
        env = "QDEP_LOCK_MODE",
        default_value_t = LockMode::default()
    )]
    pub lock_mode: LockMode,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Build the runtime configuration from the global options
    pub fn config(&self) -> Result<Config> {
        let cache_root = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => default_cache_root()?,
        };

        let mut config = Config::new(cache_root)
            .with_version_ordering(self.version_ordering)
            .with_lock_mode(self.lock_mode);
        if let Some(raw) = &self.source_override {
            config = config.with_source_overrides(raw.clone());
        }
        if let Some(template) = &self.url_template {
            config = config.with_url_template(template.clone())?;
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tags and branches of a package
    Versions(VersionsArgs),

    /// Show what a package descriptor expands to
    Query(QueryArgs),

    /// Download the sources of packages into the cache
    Get(GetArgs),

    /// Check pinned packages for newer tags
    Update(UpdateArgs),

    /// Print package identifiers
    #[command(hide = true)]
    Dephash(DephashArgs),

    /// Resolve a package to a cached source tree
    #[command(hide = true)]
    Pkgresolve(PkgresolveArgs),

    /// Manage the source cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
