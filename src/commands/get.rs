//! Get command: download the sources of packages into the cache

use crate::cache::{FetchPolicy, SourceCache};
use crate::cli::GetArgs;
use crate::config::Config;
use crate::descriptor::IncludeMode;
use crate::error::Result;
use crate::resolve::{ResolutionContext, Resolver};

pub fn run(config: &Config, args: &GetArgs) -> Result<()> {
    config.ensure_cache_root()?;
    let cache = SourceCache::from_config(config);
    let resolver = Resolver::new(config, &cache);
    let mut ctx = ResolutionContext::new();

    println!("Found {} initial packages", args.packages.len());
    for package in &args.packages {
        if ctx.contains(&resolver.identify(package, IncludeMode::Include)?) {
            continue;
        }

        println!("Downloading sources for {package}...");
        resolver.resolve(
            &mut ctx,
            package,
            None,
            IncludeMode::Include,
            FetchPolicy::default(),
        )?;
    }
    println!("Done!");
    Ok(())
}
