use console::Style;
use inquire::Confirm;

use crate::cache::SourceCache;
use crate::cache::stats::format_size;
use crate::cli::{CacheArgs, CacheSubcommand};
use crate::config::Config;
use crate::error::Result;

pub fn run(config: &Config, args: CacheArgs) -> Result<()> {
    let cache = SourceCache::from_config(config);

    match args.command {
        Some(CacheSubcommand::List) => list_cached(&cache),
        Some(CacheSubcommand::Clear(clear_args)) => {
            if !clear_args.yes && !confirm_clear()? {
                println!("Cache left untouched.");
                return Ok(());
            }
            let freed = cache.clear()?;
            println!("Removed {} bytes ({})", freed, format_size(freed));
            Ok(())
        }
        // Default: show only cache statistics
        None => show_cache_stats(&cache),
    }
}

fn print_stats_header(cache: &SourceCache) -> Result<usize> {
    let stats = cache.stats()?;

    println!("Cache Statistics:");
    println!("  Location: {}", cache.root().display());
    println!("  Repositories: {}", stats.repositories);
    println!("  Versions: {}", stats.versions);
    println!("  Size: {}", stats.formatted_size());

    Ok(stats.repositories)
}

fn show_cache_stats(cache: &SourceCache) -> Result<()> {
    if print_stats_header(cache)? == 0 {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'qdep cache list' to list cached repositories.");
        println!("Run 'qdep cache clear' to remove everything from cache.");
    }
    Ok(())
}

fn list_cached(cache: &SourceCache) -> Result<()> {
    print_stats_header(cache)?;
    println!();

    let repositories = cache.list()?;
    if repositories.is_empty() {
        println!("No cached repositories.");
        return Ok(());
    }

    println!("Cached repositories ({}):", repositories.len());
    for repository in &repositories {
        println!(
            "  {} ({})",
            Style::new().bold().yellow().apply_to(&repository.url),
            repository.formatted_size()
        );
        for git_ref in &repository.refs {
            println!("    {}", Style::new().cyan().apply_to(git_ref));
        }
    }
    Ok(())
}

fn confirm_clear() -> Result<bool> {
    println!(
        "All cached sources will be removed and have to be downloaded again. \
         Make sure no other qdep instance is currently running!"
    );
    Ok(Confirm::new("Remove all cached sources?")
        .with_default(false)
        .with_help_message("Press 'y' to remove, or Enter to cancel")
        .prompt()?)
}
