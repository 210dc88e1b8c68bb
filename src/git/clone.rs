//! Single-ref cloning
//!
//! A cache entry holds exactly one ref of one repository. Instead of a full
//! clone, the target is initialized empty and only the requested branch or tag
//! is fetched, shallow for remote sources. Branches end up checked out on a
//! local branch of the same name; tags end up on a detached HEAD.

use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{AutotagOption, Error, ErrorClass, ErrorCode, Repository};
use tracing::debug;

use super::ORIGIN;
use super::auth::authenticated_fetch_options;
use super::error::interpret_git_error;
use super::refs::{RefKind, head_branch, list_refs_of};
use super::submodule::update_submodules;
use super::url::{is_local, transport_url};
use crate::error::{Result, fetch};

/// How HEAD ended up after a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutHead {
    /// HEAD is a symbolic ref to this local branch; the checkout can be pulled
    Branch(String),
    /// HEAD is detached; the checkout never changes again
    Detached,
}

impl CheckoutHead {
    pub fn is_branch(&self) -> bool {
        matches!(self, CheckoutHead::Branch(_))
    }
}

/// Clone `git_ref` of `url` into `target`, which must not exist or be empty
pub fn clone_ref(url: &str, git_ref: &str, target: &Path) -> Result<CheckoutHead> {
    clone_into(url, git_ref, target)
        .map_err(|e| fetch::fetch_failed(url, git_ref, interpret_git_error(&e)))
}

fn clone_into(url: &str, git_ref: &str, target: &Path) -> std::result::Result<CheckoutHead, Error> {
    let repo = Repository::init(target)?;
    let mut remote = repo.remote(ORIGIN, &transport_url(url))?;

    let kind = list_refs_of(&mut remote)?
        .into_iter()
        .filter(|r| r.name == git_ref)
        .map(|r| r.kind)
        .min_by_key(|kind| matches!(kind, RefKind::Tag))
        .ok_or_else(|| {
            Error::new(
                ErrorCode::NotFound,
                ErrorClass::Reference,
                format!("ref '{git_ref}' not found on remote"),
            )
        })?;

    let (refspec, local_ref) = match kind {
        RefKind::Branch => (
            format!("+refs/heads/{git_ref}:refs/remotes/{ORIGIN}/{git_ref}"),
            format!("refs/remotes/{ORIGIN}/{git_ref}"),
        ),
        RefKind::Tag => (
            format!("+refs/tags/{git_ref}:refs/tags/{git_ref}"),
            format!("refs/tags/{git_ref}"),
        ),
    };

    let mut fetch_options = authenticated_fetch_options();
    fetch_options.download_tags(AutotagOption::None);
    if !is_local(url) {
        fetch_options.depth(1);
    }
    debug!("Fetching {} from {}", refspec, url);
    remote.fetch(&[refspec.as_str()], Some(&mut fetch_options), None)?;

    let commit = repo.find_reference(&local_ref)?.peel_to_commit()?;
    match kind {
        RefKind::Branch => {
            repo.branch(git_ref, &commit, false)?;
            repo.set_head(&format!("refs/heads/{git_ref}"))?;
        }
        RefKind::Tag => repo.set_head_detached(commit.id())?,
    }

    repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
    update_submodules(&repo)?;

    Ok(match head_branch(&repo)? {
        Some(branch) => CheckoutHead::Branch(branch),
        None => CheckoutHead::Detached,
    })
}
