//! Dephash command: print package identifiers

use crate::cli::DephashArgs;
use crate::config::Config;
use crate::descriptor::{self, IncludeMode};
use crate::error::Result;
use crate::identity::PackageId;

pub fn run(config: &Config, args: &DephashArgs) -> Result<()> {
    let mode = IncludeMode::from_project_flag(args.project);
    for package in &args.packages {
        println!("{}", dephash_line(config, package, mode, args.pkgpath)?);
    }
    Ok(())
}

fn dephash_line(config: &Config, package: &str, mode: IncludeMode, pkgpath: bool) -> Result<String> {
    let spec = descriptor::parse(package, None, mode, config.url_template())?;
    let id = PackageId::derive(&spec.url, &spec.sub_path);
    Ok(if pkgpath {
        format!("{id};{}", spec.sub_path)
    } else {
        id.to_string()
    })
}
