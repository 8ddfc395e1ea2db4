//! UpdateDocumentHandler - Command handler for publishing new document content.

use std::sync::Arc;
use tracing::info;

use super::input::{parse_document_id, VersionInput};
use super::{load_document, DocumentHandlerError, DocumentView};
use crate::domain::foundation::{CommandMetadata, ValidationErrors};
use crate::ports::DocumentRepository;

/// Command to append a new version with updated content.
#[derive(Debug, Clone)]
pub struct UpdateDocumentCommand {
    pub document_id: String,
    pub version: VersionInput,
}

/// Handler for document content updates.
///
/// Appends version `max + 1` and makes it current. An unpublished document
/// becomes published again.
pub struct UpdateDocumentHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl UpdateDocumentHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<DocumentView, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let document_id = parse_document_id(&cmd.document_id, &mut errors);
        let snapshot = cmd.version.parse(&mut errors);
        let (Some(document_id), Some(snapshot)) = (document_id, snapshot) else {
            return Err(errors.into());
        };

        let mut document = load_document(self.repository.as_ref(), document_id).await?;
        let version = document.publish(snapshot)?.number();

        self.repository
            .update(&document)
            .await
            .map_err(|e| DocumentHandlerError::persistence("save document", e))?;

        info!(
            document_id = %document_id,
            version = %version,
            correlation_id = %metadata.correlation_id(),
            "Published new document version"
        );

        Ok(DocumentView::from(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::document::input::version_input;
    use crate::application::handlers::document::test_support::{
        published_document, MockDocumentRepository,
    };
    use crate::domain::foundation::{DocumentId, ErrorCode};

    #[tokio::test]
    async fn appends_next_version_and_makes_it_current() {
        let doc = published_document(1);
        let repo = Arc::new(MockDocumentRepository::new().with_document(&doc));
        let handler = UpdateDocumentHandler::new(repo.clone());

        let view = handler
            .handle(
                UpdateDocumentCommand {
                    document_id: doc.id().to_string(),
                    version: version_input("A2", "def5678", "y"),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(view.version_count, 2);
        let current = view.current_version.unwrap();
        assert_eq!(current.version_number.as_u32(), 2);
        assert_eq!(current.title, "A2");
        assert_eq!(repo.update_count(), 1);
        assert_eq!(repo.stored(doc.id()).unwrap().versions().len(), 2);
    }

    #[tokio::test]
    async fn republishes_unpublished_document() {
        let mut doc = published_document(2);
        doc.unpublish().unwrap();
        let repo = Arc::new(MockDocumentRepository::new().with_document(&doc));
        let handler = UpdateDocumentHandler::new(repo);

        let view = handler
            .handle(
                UpdateDocumentCommand {
                    document_id: doc.id().to_string(),
                    version: version_input("B", "0123abc", "z"),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert!(view.is_published);
        assert_eq!(view.current_version.unwrap().version_number.as_u32(), 3);
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let repo = Arc::new(MockDocumentRepository::new());
        let handler = UpdateDocumentHandler::new(repo);

        let err = handler
            .handle(
                UpdateDocumentCommand {
                    document_id: DocumentId::new().to_string(),
                    version: version_input("A", "abc", "x"),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::DocumentNotFound);
    }

    #[tokio::test]
    async fn invalid_content_leaves_history_untouched() {
        let doc = published_document(1);
        let repo = Arc::new(MockDocumentRepository::new().with_document(&doc));
        let handler = UpdateDocumentHandler::new(repo.clone());

        let err = handler
            .handle(
                UpdateDocumentCommand {
                    document_id: doc.id().to_string(),
                    version: version_input("A2", "has space", "y"),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.invalid_fields(), vec!["commit_hash"]);
        assert_eq!(repo.update_count(), 0);
        assert_eq!(repo.stored(doc.id()).unwrap().versions().len(), 1);
    }
}
