//! Query command: show what a descriptor expands to and whether it exists

use std::fmt::Write as _;

use tracing::debug;

use super::versions::VersionListing;
use crate::cli::QueryArgs;
use crate::config::Config;
use crate::descriptor::{self, IncludeMode, PackageSpec};
use crate::error::{Result, fetch};
use crate::oracle::{RefSource, VersionOracle};

pub fn run(config: &Config, args: &QueryArgs) -> Result<()> {
    let oracle = VersionOracle::git(config.version_ordering());
    let report = QueryReport::build(&oracle, config.url_template(), &args.package, !args.no_check)?;

    if args.expand {
        let name = report
            .spec
            .expanded_name()
            .ok_or_else(|| fetch::no_version_available(&report.spec.url))?;
        println!("{name}");
        return Ok(());
    }

    print!("{}", report.render());
    if args.versions {
        println!();
        let listing = VersionListing::fetch(&oracle, &report.spec.url, true, true, None)?;
        print!("{}", listing.long());
    }
    Ok(())
}

#[derive(Debug)]
pub(crate) struct QueryReport {
    input: String,
    spec: PackageSpec,
    /// `None` when the check was skipped
    exists: Option<bool>,
}

impl QueryReport {
    /// Parse `input` and, with `check`, look the version up on the remote.
    ///
    /// Without a pinned ref the latest tag fills in the version. An unreachable
    /// remote counts as "does not exist".
    pub(crate) fn build<S: RefSource>(
        oracle: &VersionOracle<S>,
        url_template: &str,
        input: &str,
        check: bool,
    ) -> Result<Self> {
        let mut spec = descriptor::parse(input, None, IncludeMode::Include, url_template)?;
        if !check {
            return Ok(Self {
                input: input.to_string(),
                spec,
                exists: None,
            });
        }

        let exists = match spec.git_ref.clone() {
            None => {
                spec.git_ref = oracle.latest(&spec.url, true).unwrap_or_else(|e| {
                    debug!("Could not list {}: {}", spec.url, e);
                    None
                });
                spec.git_ref.is_some()
            }
            Some(git_ref) => match oracle.list_refs(&spec.url, true, true, true) {
                Ok(refs) => refs.contains(&git_ref),
                Err(e) => {
                    debug!("Could not list {}: {}", spec.url, e);
                    false
                }
            },
        };

        Ok(Self {
            input: input.to_string(),
            spec,
            exists: Some(exists),
        })
    }

    pub(crate) fn render(&self) -> String {
        let none = || "None".to_string();
        let mut out = String::new();
        let _ = writeln!(out, "Input: {}", self.input);
        let _ = writeln!(
            out,
            "Expanded Name: {}",
            self.spec.expanded_name().unwrap_or_else(none)
        );
        let _ = writeln!(out, "URL: {}", self.spec.url);
        let _ = writeln!(
            out,
            "Version: {}",
            self.spec.git_ref.clone().unwrap_or_else(none)
        );
        let _ = writeln!(out, "Path: {}", self.spec.sub_path);
        if let Some(exists) = self.exists {
            let _ = writeln!(out, "Exists: {exists}");
        }
        out
    }
}
