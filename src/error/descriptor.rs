//! Descriptor grammar errors

use super::QdepError;

/// Creates an invalid descriptor error carrying the offending input verbatim
pub fn invalid(descriptor: impl Into<String>, reason: impl Into<String>) -> QdepError {
    QdepError::InvalidDescriptor {
        descriptor: descriptor.into(),
        reason: reason.into(),
    }
}
