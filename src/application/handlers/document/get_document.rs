//! GetDocumentHandler - Query handler for a single document.

use std::sync::Arc;

use super::input::parse_document_id;
use super::{load_document, DocumentHandlerError, DocumentView};
use crate::domain::foundation::ValidationErrors;
use crate::ports::DocumentRepository;

/// Query for a document by ID.
#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub document_id: String,
}

/// Handler for retrieving a document with its current version.
pub struct GetDocumentHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<DocumentView, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id =
            parse_document_id(&query.document_id, &mut errors).ok_or(errors)?;

        let document = load_document(self.repository.as_ref(), document_id).await?;
        Ok(DocumentView::from(&document))
    }
}
