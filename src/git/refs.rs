//! Ref listing and inspection
//!
//! This module handles:
//! - Listing the tags and branches a remote advertises, without a local repository
//! - Telling whether a checked-out repository sits on a branch or a detached head

use git2::{Direction, Remote, RemoteCallbacks, Repository};

use super::auth::setup_auth_callbacks;
use super::error::interpret_git_error;
use super::url::transport_url;
use crate::error::{Result, fetch};

const TAG_PREFIX: &str = "refs/tags/";
const BRANCH_PREFIX: &str = "refs/heads/";
const PEELED_SUFFIX: &str = "^{}";

/// Kind of a named ref on a remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Tag,
    Branch,
}

/// A tag or branch advertised by a remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub name: String,
    pub kind: RefKind,
}

impl RemoteRef {
    /// Parse a fully qualified ref name; peeled tag entries and other namespaces yield `None`
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        if full_name.ends_with(PEELED_SUFFIX) {
            return None;
        }
        if let Some(name) = full_name.strip_prefix(TAG_PREFIX) {
            return Some(Self {
                name: name.to_string(),
                kind: RefKind::Tag,
            });
        }
        full_name.strip_prefix(BRANCH_PREFIX).map(|name| Self {
            name: name.to_string(),
            kind: RefKind::Branch,
        })
    }
}

/// List the tags and branches of `url` in the order the remote advertises them
pub fn list_remote_refs(url: &str) -> Result<Vec<RemoteRef>> {
    let unavailable = |e: git2::Error| fetch::remote_unavailable(url, interpret_git_error(&e));

    let transport = transport_url(url);
    let mut remote = Remote::create_detached(transport.as_str()).map_err(unavailable)?;
    list_refs_of(&mut remote).map_err(unavailable)
}

/// List the tags and branches advertised by an already configured remote
pub fn list_refs_of(remote: &mut Remote<'_>) -> std::result::Result<Vec<RemoteRef>, git2::Error> {
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);

    let connection = remote.connect_auth(Direction::Fetch, Some(callbacks), None)?;
    let refs = connection
        .list()?
        .iter()
        .filter_map(|head| RemoteRef::from_full_name(head.name()))
        .collect();
    Ok(refs)
}

/// Get the branch name HEAD points to, or `None` when HEAD is detached
pub fn head_branch(repo: &Repository) -> std::result::Result<Option<String>, git2::Error> {
    if repo.head_detached()? {
        return Ok(None);
    }
    let head = repo.head()?;
    Ok(head.shorthand().map(str::to_string))
}
