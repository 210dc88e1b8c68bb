//! Version oracle
//!
//! Answers "which tags and branches does this source have" and "which tag is
//! the latest". By default "latest" is simply the last tag in byte order, the
//! same order a `git ls-remote` listing reports. That order is not aware of
//! semantic versions (`1.10` sorts before `1.2`), so a semver-aware ordering
//! can be selected instead.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use tracing::debug;

use crate::error::{Result, fetch};
use crate::git::{self, RefKind, RemoteRef};

/// How tag and branch names are ordered; the last name is the "latest"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionOrdering {
    #[default]
    Lexicographic,
    Semver,
}

impl VersionOrdering {
    /// Sort `names` in place so that the latest one comes last
    pub fn sort(self, names: &mut [String]) {
        match self {
            VersionOrdering::Lexicographic => names.sort(),
            VersionOrdering::Semver => names.sort_by_cached_key(|name| (semver_key(name), name.clone())),
        }
    }
}

impl FromStr for VersionOrdering {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicographic" => Ok(VersionOrdering::Lexicographic),
            "semver" => Ok(VersionOrdering::Semver),
            other => Err(format!(
                "unknown version ordering '{other}' (expected 'lexicographic' or 'semver')"
            )),
        }
    }
}

impl fmt::Display for VersionOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOrdering::Lexicographic => f.write_str("lexicographic"),
            VersionOrdering::Semver => f.write_str("semver"),
        }
    }
}

/// Parse a tag name as a semantic version, tolerating a `v` prefix and missing components
fn semver_key(name: &str) -> Option<Version> {
    let trimmed = name.strip_prefix(['v', 'V']).unwrap_or(name);
    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(split);
    let components: Vec<&str> = core.split('.').collect();
    if components.len() >= 3
        || components
            .iter()
            .any(|c| c.is_empty() || !c.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let padding = ".0".repeat(3 - components.len());
    Version::parse(&format!("{core}{padding}{rest}")).ok()
}

/// Anything that can list the refs a source advertises
pub trait RefSource {
    fn list(&self, url: &str) -> Result<Vec<RemoteRef>>;
}

/// Lists refs by connecting to the remote with libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRemote;

impl RefSource for GitRemote {
    fn list(&self, url: &str) -> Result<Vec<RemoteRef>> {
        git::list_remote_refs(url)
    }
}

/// Tags and branches of one source, each sorted by the configured ordering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefListing {
    pub tags: Vec<String>,
    pub branches: Vec<String>,
}

impl RefListing {
    pub fn latest_tag(&self) -> Option<&str> {
        self.tags.last().map(String::as_str)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.branches.iter().any(|b| b == name)
    }
}

pub struct VersionOracle<S = GitRemote> {
    source: S,
    ordering: VersionOrdering,
}

impl VersionOracle<GitRemote> {
    pub fn git(ordering: VersionOrdering) -> Self {
        Self::new(GitRemote, ordering)
    }
}

impl<S: RefSource> VersionOracle<S> {
    pub fn new(source: S, ordering: VersionOrdering) -> Self {
        Self { source, ordering }
    }

    pub fn ordering(&self) -> VersionOrdering {
        self.ordering
    }

    /// Fetch tags and branches of `url` in one round trip.
    ///
    /// An unreachable remote is always an error; a reachable one with no refs
    /// yields an empty listing.
    pub fn listing(&self, url: &str) -> Result<RefListing> {
        let mut listing = RefListing::default();
        for remote_ref in self.source.list(url)? {
            match remote_ref.kind {
                RefKind::Tag => listing.tags.push(remote_ref.name),
                RefKind::Branch => listing.branches.push(remote_ref.name),
            }
        }
        self.ordering.sort(&mut listing.tags);
        self.ordering.sort(&mut listing.branches);
        debug!(
            "{} has {} tag(s) and {} branch(es)",
            url,
            listing.tags.len(),
            listing.branches.len()
        );
        Ok(listing)
    }

    /// List the branches and/or tags of `url`, branches first.
    ///
    /// With `allow_empty` unset, an empty result is reported as [`NoRefsFound`](crate::error::QdepError::NoRefsFound).
    pub fn list_refs(
        &self,
        url: &str,
        tags: bool,
        branches: bool,
        allow_empty: bool,
    ) -> Result<Vec<String>> {
        if !tags && !branches {
            return Ok(Vec::new());
        }

        let listing = self.listing(url)?;
        let mut refs = Vec::new();
        if branches {
            refs.extend(listing.branches);
        }
        if tags {
            refs.extend(listing.tags);
        }

        if refs.is_empty() && !allow_empty {
            return Err(fetch::no_refs_found(url));
        }
        Ok(refs)
    }

    /// The latest tag of `url`, or `None` when it has none and `allow_empty` is set
    pub fn latest(&self, url: &str, allow_empty: bool) -> Result<Option<String>> {
        Ok(self.list_refs(url, true, false, allow_empty)?.pop())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StaticRefs;
    use super::*;
    use crate::error::QdepError;

    const URL: &str = "https://github.com/acme/widgets.git";

    fn oracle(ordering: VersionOrdering) -> VersionOracle<StaticRefs> {
        VersionOracle::new(
            StaticRefs::default().with(
                URL,
                &["1.2.0", "1.0.0", "1.10.0", "1.0.1"],
                &["master", "develop"],
            ),
            ordering,
        )
    }

    #[test]
    fn test_ordering_from_str() {
        assert_eq!(
            "semver".parse::<VersionOrdering>().unwrap(),
            VersionOrdering::Semver
        );
        assert_eq!(
            "Lexicographic".parse::<VersionOrdering>().unwrap(),
            VersionOrdering::Lexicographic
        );
        assert!("newest".parse::<VersionOrdering>().is_err());
    }

    #[test]
    fn test_lexicographic_latest_is_last_in_byte_order() {
        let latest = oracle(VersionOrdering::Lexicographic)
            .latest(URL, false)
            .unwrap();
        assert_eq!(latest.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_semver_latest() {
        let latest = oracle(VersionOrdering::Semver).latest(URL, false).unwrap();
        assert_eq!(latest.as_deref(), Some("1.10.0"));
    }

    #[test]
    fn test_semver_sort_pads_and_strips_prefix() {
        let mut names: Vec<String> = ["v1.10", "1.2", "nightly", "v1.2.1", "1.0.0-rc.1", "1.0.0"]
            .iter()
            .map(ToString::to_string)
            .collect();
        VersionOrdering::Semver.sort(&mut names);
        assert_eq!(
            names,
            vec!["nightly", "1.0.0-rc.1", "1.0.0", "1.2", "v1.2.1", "v1.10"]
        );
    }

    #[test]
    fn test_list_refs_branches_first() {
        let refs = oracle(VersionOrdering::Lexicographic)
            .list_refs(URL, true, true, false)
            .unwrap();
        assert_eq!(
            refs,
            vec!["develop", "master", "1.0.0", "1.0.1", "1.10.0", "1.2.0"]
        );
    }

    #[test]
    fn test_empty_listing() {
        let oracle = VersionOracle::new(
            StaticRefs::default().with(URL, &[], &["master"]),
            VersionOrdering::Lexicographic,
        );
        assert_eq!(oracle.latest(URL, true).unwrap(), None);
        assert!(matches!(
            oracle.latest(URL, false),
            Err(QdepError::NoRefsFound { .. })
        ));
    }

    #[test]
    fn test_list_nothing_skips_remote() {
        let oracle = VersionOracle::new(StaticRefs::default(), VersionOrdering::Lexicographic);
        assert!(oracle.list_refs(URL, false, false, false).unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_is_error_even_when_empty_allowed() {
        let oracle = VersionOracle::new(StaticRefs::default(), VersionOrdering::Lexicographic);
        assert!(matches!(
            oracle.list_refs(URL, true, true, true),
            Err(QdepError::RemoteUnavailable { .. })
        ));
    }
}
