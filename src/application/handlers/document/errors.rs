//! Error type shared by the document command and query handlers.

use crate::domain::document::{DocumentError, VersionNumber};
use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, ValidationError, ValidationErrors,
};

/// Error type for document use cases.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentHandlerError {
    /// One or more input fields are invalid.
    ValidationFailed(ValidationErrors),
    /// The document or version does not exist.
    NotFound { resource: &'static str, id: String },
    /// The operation conflicts with the document's current state.
    Conflict { code: ErrorCode, message: String },
    /// Persistence or invariant failure.
    Internal(String),
}

impl DocumentHandlerError {
    pub fn document_not_found(id: DocumentId) -> Self {
        DocumentHandlerError::NotFound {
            resource: "document",
            id: id.to_string(),
        }
    }

    pub fn version_not_found(number: VersionNumber) -> Self {
        DocumentHandlerError::NotFound {
            resource: "document_version",
            id: number.to_string(),
        }
    }

    /// Maps a repository failure, annotating it with the attempted action.
    ///
    /// Revision mismatches surface as `Conflict`; everything else is internal.
    pub fn persistence(action: &str, err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrencyConflict => DocumentHandlerError::Conflict {
                code: ErrorCode::ConcurrencyConflict,
                message: err.message,
            },
            _ => DocumentHandlerError::Internal(format!("failed to {}: {}", action, err)),
        }
    }

    /// Returns the error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentHandlerError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            DocumentHandlerError::NotFound {
                resource: "document_version",
                ..
            } => ErrorCode::VersionNotFound,
            DocumentHandlerError::NotFound { .. } => ErrorCode::DocumentNotFound,
            DocumentHandlerError::Conflict { code, .. } => *code,
            DocumentHandlerError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Returns the failing field names for validation errors.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            DocumentHandlerError::ValidationFailed(errors) => errors.fields(),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for DocumentHandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentHandlerError::ValidationFailed(errors) => {
                write!(f, "Validation failed: {}", errors)
            }
            DocumentHandlerError::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            DocumentHandlerError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
            DocumentHandlerError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentHandlerError {}

impl From<ValidationErrors> for DocumentHandlerError {
    fn from(errors: ValidationErrors) -> Self {
        DocumentHandlerError::ValidationFailed(errors)
    }
}

impl From<ValidationError> for DocumentHandlerError {
    fn from(err: ValidationError) -> Self {
        DocumentHandlerError::ValidationFailed(err.into())
    }
}

impl From<DocumentError> for DocumentHandlerError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::VersionNotFound(number) => Self::version_not_found(number),
            DocumentError::NotPublished { .. }
            | DocumentError::VersionUnpublished(_)
            | DocumentError::AlreadyUnpublished(_) => DocumentHandlerError::Conflict {
                code: err.code(),
                message: err.to_string(),
            },
            DocumentError::Validation(v) => v.into(),
            DocumentError::NoCurrentVersion
            | DocumentError::DocumentMismatch { .. }
            | DocumentError::DuplicateVersion(_) => DocumentHandlerError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_not_found_maps_to_not_found() {
        let two = VersionNumber::new(2).unwrap();
        let err: DocumentHandlerError = DocumentError::VersionNotFound(two).into();

        assert_eq!(err, DocumentHandlerError::version_not_found(two));
        assert_eq!(err.code(), ErrorCode::VersionNotFound);
        assert_eq!(err.to_string(), "document_version not found: 2");
    }

    #[test]
    fn business_rule_errors_map_to_conflict() {
        let err: DocumentHandlerError = DocumentError::NotPublished {
            operation: "rollback",
        }
        .into();

        assert_eq!(
            err,
            DocumentHandlerError::Conflict {
                code: ErrorCode::NotPublished,
                message: "cannot rollback unpublished document".to_string(),
            }
        );
    }

    #[test]
    fn entity_validation_maps_to_validation_failed() {
        let err: DocumentHandlerError =
            DocumentError::Validation(ValidationError::empty_field("title")).into();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(err.invalid_fields(), vec!["title"]);
    }

    #[test]
    fn revision_mismatch_maps_to_conflict() {
        let err = DocumentHandlerError::persistence(
            "save document",
            DomainError::conflict("revision mismatch"),
        );
        assert_eq!(err.code(), ErrorCode::ConcurrencyConflict);
    }

    #[test]
    fn database_failure_is_annotated() {
        let err = DocumentHandlerError::persistence(
            "save document",
            DomainError::database("connection reset"),
        );
        assert_eq!(
            err,
            DocumentHandlerError::Internal(
                "failed to save document: [DATABASE_ERROR] connection reset".to_string()
            )
        );
    }
}
