//! Update checker
//!
//! Finds descriptors pinned to a tag that is no longer the latest one and
//! rewrites them to the latest tag. Descriptors without a ref, sources without
//! tags, and refs that name a branch are left alone.

use std::collections::BTreeMap;

use tracing::info;

use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::oracle::{RefSource, VersionOracle};

/// Result of an update check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Every input descriptor in input order, rewritten where an update exists
    pub descriptors: Vec<String>,
    /// Original descriptor to its rewritten form
    pub replacements: BTreeMap<String, String>,
}

impl UpdateReport {
    pub fn has_updates(&self) -> bool {
        !self.replacements.is_empty()
    }
}

/// Check every descriptor in `descriptors` for a newer tag
pub fn check_for_updates<S, I>(
    descriptors: I,
    oracle: &VersionOracle<S>,
    url_template: &str,
) -> Result<UpdateReport>
where
    S: RefSource,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut report = UpdateReport::default();

    for input in descriptors {
        let input = input.as_ref();
        let updated = newer_descriptor(input, oracle, url_template)?;

        match updated {
            Some(updated) => {
                report.descriptors.push(updated.clone());
                report.replacements.insert(input.to_string(), updated);
            }
            None => report.descriptors.push(input.to_string()),
        }
    }

    Ok(report)
}

fn newer_descriptor<S: RefSource>(
    input: &str,
    oracle: &VersionOracle<S>,
    url_template: &str,
) -> Result<Option<String>> {
    let descriptor = Descriptor::parse(input)?;
    let Some(pinned) = descriptor.git_ref() else {
        return Ok(None);
    };

    let url = descriptor.source().expand(url_template);
    let listing = oracle.listing(&url)?;
    let Some(latest) = listing.latest_tag() else {
        return Ok(None);
    };
    if !listing.has_tag(pinned) && listing.has_branch(pinned) {
        return Ok(None);
    }
    if latest == pinned {
        return Ok(None);
    }

    info!(
        "Found a new version for package {}: {} -> {}",
        descriptor.source().as_str(),
        pinned,
        latest
    );
    Ok(Some(descriptor.with_ref(latest)))
}
