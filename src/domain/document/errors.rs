//! Business-rule errors raised by the document aggregate.

use thiserror::Error;

use super::VersionNumber;
use crate::domain::foundation::{DocumentId, ErrorCode, ValidationError};

/// Errors returned by `Document` and `DocumentVersion` mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Operation requires a published document.
    #[error("cannot {operation} unpublished document")]
    NotPublished { operation: &'static str },

    /// No version with this number exists.
    #[error("version {0} not found")]
    VersionNotFound(VersionNumber),

    /// The target version has been unpublished and cannot become current.
    #[error("version {0} is unpublished")]
    VersionUnpublished(VersionNumber),

    /// The version was already unpublished.
    #[error("version {0} already unpublished")]
    AlreadyUnpublished(VersionNumber),

    /// Document is marked published but has no current version.
    #[error("document has no current version")]
    NoCurrentVersion,

    /// A version was attached to the wrong document.
    #[error("version belongs to document {actual}, expected {expected}")]
    DocumentMismatch {
        expected: DocumentId,
        actual: DocumentId,
    },

    /// A version number was attached twice.
    #[error("version {0} already exists")]
    DuplicateVersion(VersionNumber),

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DocumentError {
    /// Maps the error to its domain error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::NotPublished { .. } => ErrorCode::NotPublished,
            DocumentError::VersionNotFound(_) => ErrorCode::VersionNotFound,
            DocumentError::VersionUnpublished(_) => ErrorCode::VersionUnpublished,
            DocumentError::AlreadyUnpublished(_) => ErrorCode::AlreadyUnpublished,
            DocumentError::NoCurrentVersion => ErrorCode::InternalError,
            DocumentError::DocumentMismatch { .. } => ErrorCode::InternalError,
            DocumentError::DuplicateVersion(_) => ErrorCode::InternalError,
            DocumentError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }
}
