//! Cache errors

use super::QdepError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> QdepError {
    QdepError::CacheOperationFailed {
        message: message.into(),
    }
}

pub fn lock_failed(path: impl Into<String>, reason: impl Into<String>) -> QdepError {
    QdepError::LockFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
