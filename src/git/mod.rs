//! Git transport for qdep
//!
//! This module handles:
//! - Listing the tags and branches of a remote
//! - Cloning a single branch or tag into a cache entry
//! - Fast-forwarding branch checkouts
//! - Recursive submodule updates
//!
//! Authentication is delegated entirely to git's native system:
//! - SSH agent and keys from ~/.ssh/
//! - Git credential helpers

pub mod auth;
pub mod clone;
pub mod error;
pub mod pull;
pub mod refs;
pub mod submodule;
pub mod url;

#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) mod test_repo;

pub use clone::{CheckoutHead, clone_ref};
pub use pull::{PullOutcome, pull_fast_forward};
pub use refs::{RefKind, RemoteRef, list_remote_refs};

/// Name of the single remote every cache entry tracks
pub const ORIGIN: &str = "origin";
