//! UnpublishDocumentHandler - Command handler for withdrawing a published document.

use std::sync::Arc;
use tracing::info;

use super::input::parse_document_id;
use super::{load_document, DocumentHandlerError, DocumentView};
use crate::domain::foundation::{CommandMetadata, ValidationErrors};
use crate::ports::DocumentRepository;

/// Command to unpublish a document.
#[derive(Debug, Clone)]
pub struct UnpublishDocumentCommand {
    pub document_id: String,
}

/// Handler for unpublishing. The current version is unpublished and the
/// document is left with no current version; history is kept.
pub struct UnpublishDocumentHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl UnpublishDocumentHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UnpublishDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<DocumentView, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id = parse_document_id(&cmd.document_id, &mut errors).ok_or(errors)?;

        let mut document = load_document(self.repository.as_ref(), document_id).await?;
        let withdrawn = document.current_version_number();
        document.unpublish()?;

        self.repository
            .update(&document)
            .await
            .map_err(|e| DocumentHandlerError::persistence("save document", e))?;

        info!(
            document_id = %document_id,
            version = ?withdrawn.map(|n| n.as_u32()),
            correlation_id = %metadata.correlation_id(),
            "Unpublished document"
        );

        Ok(DocumentView::from(&document))
    }
}
