//! Update command: check pinned packages for newer tags

use crate::cli::UpdateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::oracle::VersionOracle;
use crate::update::{UpdateReport, check_for_updates};

pub fn run(config: &Config, args: &UpdateArgs) -> Result<()> {
    let oracle = VersionOracle::git(config.version_ordering());
    let report = check_for_updates(&args.packages, &oracle, config.url_template())?;
    print!("{}", render(&report, args.all));
    Ok(())
}

fn render(report: &UpdateReport, all: bool) -> String {
    let mut out = String::new();
    if report.has_updates() {
        for (old, new) in &report.replacements {
            out.push_str(&format!("{old} -> {new}\n"));
        }
    } else {
        out.push_str("All packages are up to date.\n");
    }

    if all {
        out.push_str(&format!(
            "\nQDEP_DEPENDS = {}\n",
            report.descriptors.join(" \\\n\t")
        ));
    }
    out
}
