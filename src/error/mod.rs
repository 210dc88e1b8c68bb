//! Error types and handling for qdep
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Convenience constructors live in sub-modules grouped by error domain:
//! - [`descriptor`]: descriptor grammar errors
//! - [`fetch`]: clone, pull, and remote listing errors
//! - [`cache`]: cache directory and lock errors

pub mod cache;
pub mod descriptor;
pub mod fetch;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for qdep operations
#[derive(Error, Diagnostic, Debug)]
pub enum QdepError {
    // Descriptor errors
    #[error("Given package is not a valid package descriptor: {descriptor} ({reason})")]
    #[diagnostic(
        code(qdep::descriptor::invalid),
        help(
            "Valid formats: owner/repo[@ref[/sub/path.pri]], https://host/owner/repo.git[@ref], git@host:owner/repo.git[@ref]"
        )
    )]
    InvalidDescriptor { descriptor: String, reason: String },

    // Policy errors
    #[error("Cannot install new package {url}: cloning is disabled")]
    #[diagnostic(
        code(qdep::policy::clone_disabled),
        help("Remove --no-clone to allow installation of packages that are not cached yet")
    )]
    CloneDisabled { url: String },

    // Version errors
    #[error("No version available for {url}: the package has no tags and no version was given")]
    #[diagnostic(
        code(qdep::version::none_available),
        help("Pin a branch or tag explicitly, e.g. owner/repo@master")
    )]
    NoVersionAvailable { url: String },

    #[error("No matching refs found on {url}")]
    #[diagnostic(code(qdep::version::no_refs))]
    NoRefsFound { url: String },

    // Transport errors
    #[error("Remote {url} is unavailable: {reason}")]
    #[diagnostic(
        code(qdep::remote::unavailable),
        help("Check that the URL is correct and you have access to the repository")
    )]
    RemoteUnavailable { url: String, reason: String },

    #[error("Failed to fetch {url} at '{git_ref}': {reason}")]
    #[diagnostic(code(qdep::fetch::failed))]
    FetchFailed {
        url: String,
        git_ref: String,
        reason: String,
    },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(qdep::cache::operation_failed))]
    CacheOperationFailed { message: String },

    #[error("Failed to lock cache entry {path}: {reason}")]
    #[diagnostic(code(qdep::cache::lock_failed))]
    LockFailed { path: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(qdep::config::invalid))]
    ConfigInvalid { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(qdep::fs::io_error))]
    Io { message: String },
}

impl From<std::io::Error> for QdepError {
    fn from(err: std::io::Error) -> Self {
        QdepError::Io {
            message: err.to_string(),
        }
    }
}

/// Git errors reached without a remote in scope; remote failures are mapped with their URL
impl From<git2::Error> for QdepError {
    fn from(err: git2::Error) -> Self {
        QdepError::Io {
            message: err.message().to_string(),
        }
    }
}

impl From<inquire::InquireError> for QdepError {
    fn from(err: inquire::InquireError) -> Self {
        QdepError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, QdepError>;
