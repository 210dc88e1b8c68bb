//! Versions command: list the tags and branches of a package

use std::fmt::Write as _;

use crate::cli::VersionsArgs;
use crate::config::Config;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::oracle::{RefSource, VersionOracle};

pub fn run(config: &Config, args: &VersionsArgs) -> Result<()> {
    let url = Descriptor::parse(&args.package)?
        .source()
        .expand(config.url_template());
    let oracle = VersionOracle::git(config.version_ordering());
    let listing = VersionListing::fetch(&oracle, &url, !args.no_tags, args.branches, args.limit)?;

    if args.short {
        println!("{}", listing.short());
    } else {
        print!("{}", listing.long());
    }
    Ok(())
}

/// Tags and branches of one source; `None` when that kind was not requested
#[derive(Debug, Default)]
pub(crate) struct VersionListing {
    tags: Option<Vec<String>>,
    branches: Option<Vec<String>>,
}

impl VersionListing {
    /// List `url`, keeping only the `limit` newest names of each kind
    pub(crate) fn fetch<S: RefSource>(
        oracle: &VersionOracle<S>,
        url: &str,
        tags: bool,
        branches: bool,
        limit: Option<usize>,
    ) -> Result<Self> {
        if !tags && !branches {
            return Ok(Self::default());
        }

        let listing = oracle.listing(url)?;
        let keep = |mut names: Vec<String>| {
            if let Some(limit) = limit {
                names.drain(..names.len().saturating_sub(limit));
            }
            names
        };

        Ok(Self {
            tags: tags.then(|| keep(listing.tags)),
            branches: branches.then(|| keep(listing.branches)),
        })
    }

    /// Branches then tags on one line
    pub(crate) fn short(&self) -> String {
        self.branches
            .iter()
            .chain(self.tags.iter())
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `Branches:` and `Tags:` sections, one name per line
    pub(crate) fn long(&self) -> String {
        let mut out = String::new();
        if let Some(branches) = &self.branches {
            write_section(&mut out, "Branches:", branches, " -- No branches found --");
        }
        if let Some(tags) = &self.tags {
            if self.branches.is_some() {
                out.push('\n');
            }
            write_section(&mut out, "Tags:", tags, " -- No tags found --");
        }
        out
    }
}

fn write_section(out: &mut String, header: &str, names: &[String], empty: &str) {
    let _ = writeln!(out, "{header}");
    if names.is_empty() {
        let _ = writeln!(out, "{empty}");
    }
    for name in names {
        let _ = writeln!(out, "  {name}");
    }
}
