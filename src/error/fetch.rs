//! Clone, pull, and remote listing errors

use super::QdepError;

pub fn clone_disabled(url: impl Into<String>) -> QdepError {
    QdepError::CloneDisabled { url: url.into() }
}

pub fn no_version_available(url: impl Into<String>) -> QdepError {
    QdepError::NoVersionAvailable { url: url.into() }
}

pub fn no_refs_found(url: impl Into<String>) -> QdepError {
    QdepError::NoRefsFound { url: url.into() }
}

pub fn remote_unavailable(url: impl Into<String>, reason: impl Into<String>) -> QdepError {
    QdepError::RemoteUnavailable {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a fetch failure error; callers roll back the cache entry before returning it
pub fn fetch_failed(
    url: impl Into<String>,
    git_ref: impl Into<String>,
    reason: impl Into<String>,
) -> QdepError {
    QdepError::FetchFailed {
        url: url.into(),
        git_ref: git_ref.into(),
        reason: reason.into(),
    }
}
