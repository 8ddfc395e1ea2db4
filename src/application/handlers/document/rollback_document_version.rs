//! RollbackDocumentVersionHandler - Command handler for re-pointing the current version.

use std::sync::Arc;
use tracing::info;

use super::input::{parse_document_id, parse_version_number};
use super::{load_document, DocumentHandlerError, DocumentView};
use crate::domain::foundation::{CommandMetadata, ValidationErrors};
use crate::ports::DocumentRepository;

/// Command to make an earlier version current again.
#[derive(Debug, Clone)]
pub struct RollbackDocumentVersionCommand {
    pub document_id: String,
    pub version_number: i64,
}

/// Handler for rollbacks. No version is appended.
pub struct RollbackDocumentVersionHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl RollbackDocumentVersionHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: RollbackDocumentVersionCommand,
        metadata: CommandMetadata,
    ) -> Result<DocumentView, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id = parse_document_id(&cmd.document_id, &mut errors);
        let number = parse_version_number(cmd.version_number, &mut errors);
        let (Some(document_id), Some(number)) = (document_id, number) else {
            return Err(errors.into());
        };

        let mut document = load_document(self.repository.as_ref(), document_id).await?;
        document.rollback_to_version(number)?;

        self.repository
            .update(&document)
            .await
            .map_err(|e| DocumentHandlerError::persistence("save document", e))?;

        info!(
            document_id = %document_id,
            version = %number,
            correlation_id = %metadata.correlation_id(),
            "Rolled back document"
        );

        Ok(DocumentView::from(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::document::test_support::{
        published_document, MockDocumentRepository,
    };
    use crate::domain::foundation::ErrorCode;

    fn command(document_id: String, version_number: i64) -> RollbackDocumentVersionCommand {
        RollbackDocumentVersionCommand {
            document_id,
            version_number,
        }
    }

    #[tokio::test]
    async fn rollback_repoints_current_version() {
        let doc = published_document(2);
        let repo = Arc::new(MockDocumentRepository::new().with_document(&doc));
        let handler = RollbackDocumentVersionHandler::new(repo.clone());

        let view = handler
            .handle(command(doc.id().to_string(), 1), CommandMetadata::test_fixture())
            .await
            .unwrap();

        let current = view.current_version.unwrap();
        assert_eq!(current.version_number.as_u32(), 1);
        assert_eq!(current.title, "Title 1");
        assert_eq!(view.version_count, 2);
        assert!(repo.stored(doc.id()).unwrap().is_current(current.version_number));
    }

    #[tokio::test]
    async fn rollback_of_unpublished_document_conflicts() {
        let mut doc = published_document(1);
        doc.unpublish().unwrap();
        let repo = Arc::new(MockDocumentRepository::new().with_document(&doc));
        let handler = RollbackDocumentVersionHandler::new(repo.clone());

        let err = handler
            .handle(command(doc.id().to_string(), 1), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DocumentHandlerError::Conflict {
                code: ErrorCode::NotPublished,
                message: "cannot rollback unpublished document".to_string(),
            }
        );
        assert_eq!(repo.update_count(), 0);
    }

    #[tokio::test]
    async fn rollback_beyond_latest_is_not_found() {
        let doc = published_document(2);
        let repo = Arc::new(MockDocumentRepository::new().with_document(&doc));
        let handler = RollbackDocumentVersionHandler::new(repo);

        let err = handler
            .handle(command(doc.id().to_string(), 3), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::VersionNotFound);
    }

    #[tokio::test]
    async fn rollback_to_zero_is_invalid() {
        let doc = published_document(2);
        let repo = Arc::new(MockDocumentRepository::new().with_document(&doc));
        let handler = RollbackDocumentVersionHandler::new(repo);

        let err = handler
            .handle(command(doc.id().to_string(), 0), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.invalid_fields(), vec!["version_number"]);
    }

    #[tokio::test]
    async fn update_failure_is_annotated() {
        let doc = published_document(2);
        let repo = Arc::new(MockDocumentRepository::failing().with_document(&doc));
        let handler = RollbackDocumentVersionHandler::new(repo);

        let err = handler
            .handle(command(doc.id().to_string(), 1), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(err.to_string().contains("failed to save document"));
    }
}
