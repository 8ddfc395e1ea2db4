//! Query handlers for document versions.
//!
//! Versions are read from the loaded aggregate so the `is_current_version`
//! flag is consistent with the history returned alongside it.

use std::sync::Arc;

use super::input::{parse_document_id, parse_version_number};
use super::{load_document, DocumentHandlerError, DocumentVersionView};
use crate::domain::foundation::ValidationErrors;
use crate::ports::DocumentRepository;

/// Query for one version of a document.
#[derive(Debug, Clone)]
pub struct GetDocumentVersionQuery {
    pub document_id: String,
    pub version_number: i64,
}

/// Query for the full version history of a document.
#[derive(Debug, Clone)]
pub struct GetDocumentVersionsQuery {
    pub document_id: String,
}

/// Handler for retrieving a single version.
pub struct GetDocumentVersionHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentVersionHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetDocumentVersionQuery,
    ) -> Result<DocumentVersionView, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id = parse_document_id(&query.document_id, &mut errors);
        let number = parse_version_number(query.version_number, &mut errors);
        let (Some(document_id), Some(number)) = (document_id, number) else {
            return Err(errors.into());
        };

        let document = load_document(self.repository.as_ref(), document_id).await?;
        let version = document
            .version(number)
            .ok_or_else(|| DocumentHandlerError::version_not_found(number))?;

        Ok(DocumentVersionView::of(&document, version))
    }
}

/// Handler for retrieving all versions, ordered by number.
pub struct GetDocumentVersionsHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentVersionsHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetDocumentVersionsQuery,
    ) -> Result<Vec<DocumentVersionView>, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id =
            parse_document_id(&query.document_id, &mut errors).ok_or(errors)?;

        let document = load_document(self.repository.as_ref(), document_id).await?;
        Ok(document
            .versions()
            .iter()
            .map(|v| DocumentVersionView::of(&document, v))
            .collect())
    }
}
