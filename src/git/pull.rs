//! Fast-forward-only updates of branch checkouts

use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{AutotagOption, Error, ErrorClass, ErrorCode, Repository};
use tracing::debug;

use super::ORIGIN;
use super::auth::authenticated_fetch_options;
use super::error::interpret_git_error;
use super::submodule::update_submodules;
use super::url::is_local;
use crate::error::{Result, fetch};

/// What a pull did to the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    UpToDate,
    FastForwarded,
}

/// Bring the checkout of `branch` at `path` up to date with its remote.
///
/// Only fast-forwards are applied. A shallow checkout has no history to
/// compare against, so there the remote tip is taken as is.
pub fn pull_fast_forward(path: &Path, url: &str, branch: &str) -> Result<PullOutcome> {
    pull(path, url, branch).map_err(|e| fetch::fetch_failed(url, branch, interpret_git_error(&e)))
}

fn pull(path: &Path, url: &str, branch: &str) -> std::result::Result<PullOutcome, Error> {
    let repo = Repository::open(path)?;
    let remote_ref = format!("refs/remotes/{ORIGIN}/{branch}");
    let local_ref = format!("refs/heads/{branch}");
    let refspec = format!("+{local_ref}:{remote_ref}");

    let mut fetch_options = authenticated_fetch_options();
    fetch_options.download_tags(AutotagOption::None);
    let shallow = repo.is_shallow();
    if shallow && !is_local(url) {
        fetch_options.depth(1);
    }

    debug!("Pulling {} in {}", branch, path.display());
    repo.find_remote(ORIGIN)?
        .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)?;

    let fetched = repo.find_reference(&remote_ref)?.peel_to_commit()?;
    let current = repo.find_reference(&local_ref)?.peel_to_commit()?;
    if fetched.id() == current.id() {
        return Ok(PullOutcome::UpToDate);
    }

    if !shallow {
        let annotated = repo.find_annotated_commit(fetched.id())?;
        let (analysis, _) = repo.merge_analysis(&[&annotated])?;
        if analysis.is_up_to_date() {
            return Ok(PullOutcome::UpToDate);
        }
        if !analysis.is_fast_forward() {
            return Err(Error::new(
                ErrorCode::NotFastForward,
                ErrorClass::Merge,
                format!("branch '{branch}' has diverged from its remote; not a fast-forward"),
            ));
        }
    }

    repo.find_reference(&local_ref)?
        .set_target(fetched.id(), "qdep: fast-forward")?;
    repo.set_head(&local_ref)?;
    repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
    update_submodules(&repo)?;

    Ok(PullOutcome::FastForwarded)
}
