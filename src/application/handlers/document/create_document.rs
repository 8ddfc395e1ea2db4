//! CreateDocumentHandler - Command handler for registering a new runbook document.

use std::sync::Arc;
use tracing::info;

use super::input::{parse_access_scope, parse_owner, parse_repository_id, VersionInput};
use super::{DocumentHandlerError, DocumentView};
use crate::domain::document::Document;
use crate::domain::foundation::{CommandMetadata, DocumentId, ValidationErrors};
use crate::ports::DocumentRepository;

/// Command to create a document and publish its first version.
#[derive(Debug, Clone)]
pub struct CreateDocumentCommand {
    pub repository_id: String,
    pub owner: String,
    pub access_scope: String,
    pub is_auto_update: bool,
    pub version: VersionInput,
}

/// Handler for creating documents.
///
/// The new document starts unpublished and is immediately published with
/// version 1 built from `version`.
pub struct CreateDocumentHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl CreateDocumentHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: CreateDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<DocumentView, DocumentHandlerError> {
        // 1. Validate every field before touching the aggregate
        let mut errors = ValidationErrors::new();
        let repository_id = parse_repository_id(&cmd.repository_id, &mut errors);
        let owner = parse_owner(&cmd.owner, &mut errors);
        let access_scope = parse_access_scope(&cmd.access_scope, &mut errors);
        let snapshot = cmd.version.parse(&mut errors);

        let (Some(repository_id), Some(owner), Some(access_scope), Some(snapshot)) =
            (repository_id, owner, access_scope, snapshot)
        else {
            return Err(errors.into());
        };

        // 2. Construct and publish version 1
        let mut document = Document::new(DocumentId::new(), repository_id, owner, access_scope)?;
        if cmd.is_auto_update {
            document.enable_auto_update();
        }
        document.publish(snapshot)?;

        // 3. Persist
        self.repository
            .save(&document)
            .await
            .map_err(|e| DocumentHandlerError::persistence("save document", e))?;

        info!(
            document_id = %document.id(),
            repository_id = %document.repository_id(),
            correlation_id = %metadata.correlation_id(),
            "Created document"
        );

        Ok(DocumentView::from(&document))
    }
}
