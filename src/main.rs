//! qdep - source resolution and caching for qmake package dependencies
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qdep::cli::{Cli, Commands};
use qdep::commands;

fn main() {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("qdep=warn"),
        1 => EnvFilter::new("qdep=info"),
        _ => EnvFilter::new("qdep=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Completions work even when the configuration is invalid
    let config = cli.config();
    let result = match cli.command {
        Commands::Completions(args) => commands::completions::run(&args),
        command => config.and_then(|config| commands::run(&config, command)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
