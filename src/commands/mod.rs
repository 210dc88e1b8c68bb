//! Command implementations for the qdep CLI

pub mod cache;
pub mod completions;
pub mod dephash;
pub mod get;
pub mod pkgresolve;
pub mod query;
pub mod update;
pub mod versions;

use crate::cli::Commands;
use crate::config::Config;
use crate::error::Result;

/// Run `command` against `config`
pub fn run(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Versions(args) => versions::run(config, &args),
        Commands::Query(args) => query::run(config, &args),
        Commands::Get(args) => get::run(config, &args),
        Commands::Update(args) => update::run(config, &args),
        Commands::Dephash(args) => dephash::run(config, &args),
        Commands::Pkgresolve(args) => pkgresolve::run(config, &args),
        Commands::Cache(args) => cache::run(config, args),
        Commands::Completions(args) => completions::run(&args),
    }
}
