use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache statistics:\n    qdep cache\n\n\
                  List cached repositories and refs:\n    qdep cache list\n\n\
                  Remove all cached sources:\n    qdep cache clear\n\n\
                  Remove all cached sources without asking:\n    qdep cache clear --yes")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List cached repositories and their refs
    List,

    /// Remove all cached sources
    Clear(ClearCacheArgs),
}

/// Arguments for cache clear command
#[derive(Parser, Debug)]
pub struct ClearCacheArgs {
    /// Remove the cache immediately, without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}
