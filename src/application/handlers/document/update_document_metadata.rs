//! UpdateDocumentMetadataHandler - Command handler for document settings.

use std::sync::Arc;
use tracing::{debug, info};

use super::input::{parse_access_scope, parse_document_id};
use super::{load_document, DocumentHandlerError, DocumentView};
use crate::domain::foundation::{CommandMetadata, ValidationErrors};
use crate::ports::DocumentRepository;

/// Command to change access scope and/or auto-update. Absent fields are kept.
#[derive(Debug, Clone)]
pub struct UpdateDocumentMetadataCommand {
    pub document_id: String,
    pub access_scope: Option<String>,
    pub is_auto_update: Option<bool>,
}

/// Handler for partial metadata updates.
///
/// All fields are validated before any is applied, so a rejected command
/// leaves the document untouched.
pub struct UpdateDocumentMetadataHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl UpdateDocumentMetadataHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateDocumentMetadataCommand,
        metadata: CommandMetadata,
    ) -> Result<DocumentView, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id = parse_document_id(&cmd.document_id, &mut errors);
        let access_scope = match cmd.access_scope.as_deref() {
            Some(raw) => parse_access_scope(raw, &mut errors).map(Some),
            None => Some(None),
        };
        let (Some(document_id), Some(access_scope)) = (document_id, access_scope) else {
            return Err(errors.into());
        };

        let mut document = load_document(self.repository.as_ref(), document_id).await?;

        if access_scope.is_none() && cmd.is_auto_update.is_none() {
            debug!(document_id = %document_id, "No metadata fields to update");
            return Ok(DocumentView::from(&document));
        }

        if let Some(scope) = access_scope {
            document.update_access_scope(scope);
        }
        match cmd.is_auto_update {
            Some(true) => document.enable_auto_update(),
            Some(false) => document.disable_auto_update(),
            None => {}
        }

        self.repository
            .update(&document)
            .await
            .map_err(|e| DocumentHandlerError::persistence("save document", e))?;

        info!(
            document_id = %document_id,
            access_scope = %document.access_scope(),
            is_auto_update = document.is_auto_update(),
            correlation_id = %metadata.correlation_id(),
            "Updated document metadata"
        );

        Ok(DocumentView::from(&document))
    }
}
