//! Pkgresolve command: resolve one package for the build glue
//!
//! Prints five lines: identifier, ref, base directory, subpath, and whether the
//! descriptor pinned no ref (so the caller should remember the ref it got).

use crate::cache::{FetchPolicy, SourceCache};
use crate::cli::PkgresolveArgs;
use crate::config::Config;
use crate::descriptor::IncludeMode;
use crate::error::Result;
use crate::resolve::{Resolution, ResolutionContext, Resolver};

pub fn run(config: &Config, args: &PkgresolveArgs) -> Result<()> {
    let cache = SourceCache::from_config(config);
    let resolver = Resolver::new(config, &cache);
    let policy = FetchPolicy {
        allow_pull: !args.no_pull,
        allow_clone: !args.no_clone,
    };

    let resolution = resolver.resolve(
        &mut ResolutionContext::new(),
        &args.package,
        args.version.as_deref(),
        IncludeMode::from_project_flag(args.project),
        policy,
    )?;

    print!("{}", render(&resolution));
    Ok(())
}

fn render(resolution: &Resolution) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n",
        resolution.id,
        resolution.git_ref.as_deref().unwrap_or_default(),
        resolution.base.display(),
        resolution.sub_path,
        resolution.needs_caching
    )
}
