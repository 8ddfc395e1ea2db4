//! PublishDocumentVersionHandler - Command handler for publishing an existing version.

use std::sync::Arc;
use tracing::{debug, info};

use super::input::{parse_document_id, parse_version_number};
use super::{load_document, DocumentHandlerError, DocumentView};
use crate::domain::foundation::{CommandMetadata, ValidationErrors};
use crate::ports::DocumentRepository;

/// Command to make an existing version the published, current one.
#[derive(Debug, Clone)]
pub struct PublishDocumentVersionCommand {
    pub document_id: String,
    pub version_number: i64,
}

/// Handler for publishing an existing version.
///
/// # Dispatch
///
/// - Target already current on a published document: returned unchanged,
///   nothing is persisted
/// - Document published: the current pointer moves to the target
/// - Document unpublished: the target's content is appended as a new
///   current version
pub struct PublishDocumentVersionHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl PublishDocumentVersionHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: PublishDocumentVersionCommand,
        metadata: CommandMetadata,
    ) -> Result<DocumentView, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id = parse_document_id(&cmd.document_id, &mut errors);
        let number = parse_version_number(cmd.version_number, &mut errors);
        let (Some(document_id), Some(number)) = (document_id, number) else {
            return Err(errors.into());
        };

        let mut document = load_document(self.repository.as_ref(), document_id).await?;

        if document.is_published() && document.is_current(number) {
            debug!(
                document_id = %document_id,
                version = %number,
                "Version already current, nothing to publish"
            );
            return Ok(DocumentView::from(&document));
        }

        if document.is_published() {
            document.rollback_to_version(number)?;
        } else {
            document.republish_version(number)?;
        }

        self.repository
            .update(&document)
            .await
            .map_err(|e| DocumentHandlerError::persistence("save document", e))?;

        info!(
            document_id = %document_id,
            version = %number,
            current_version = ?document.current_version_number().map(|n| n.as_u32()),
            correlation_id = %metadata.correlation_id(),
            "Published document version"
        );

        Ok(DocumentView::from(&document))
    }
}
