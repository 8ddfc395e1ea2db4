//! Document command and query handlers.
//!
//! Every command follows the same flow: validate input, load the aggregate
//! (except create), invoke exactly one aggregate operation, persist, project.

mod create_document;
mod errors;
mod get_document;
mod get_document_version;
mod input;
mod list_documents;
mod list_documents_by_repository;
mod publish_document_version;
mod rollback_document_version;
mod unpublish_document;
mod update_document;
mod update_document_metadata;
mod views;

pub use create_document::{CreateDocumentCommand, CreateDocumentHandler};
pub use errors::DocumentHandlerError;
pub use get_document::{GetDocumentHandler, GetDocumentQuery};
pub use get_document_version::{
    GetDocumentVersionHandler, GetDocumentVersionQuery, GetDocumentVersionsHandler,
    GetDocumentVersionsQuery,
};
pub use input::{VariableInput, VersionInput};
pub use list_documents::{ListDocumentsHandler, ListDocumentsQuery};
pub use list_documents_by_repository::{
    ListDocumentsByRepositoryHandler, ListDocumentsByRepositoryQuery,
};
pub use publish_document_version::{PublishDocumentVersionCommand, PublishDocumentVersionHandler};
pub use rollback_document_version::{
    RollbackDocumentVersionCommand, RollbackDocumentVersionHandler,
};
pub use unpublish_document::{UnpublishDocumentCommand, UnpublishDocumentHandler};
pub use update_document::{UpdateDocumentCommand, UpdateDocumentHandler};
pub use update_document_metadata::{
    UpdateDocumentMetadataCommand, UpdateDocumentMetadataHandler,
};
pub use views::{DocumentList, DocumentVersionView, DocumentView};

use crate::domain::document::Document;
use crate::domain::foundation::DocumentId;
use crate::ports::DocumentRepository;

/// Loads a document or fails with `NotFound`.
async fn load_document(
    repository: &dyn DocumentRepository,
    id: DocumentId,
) -> Result<Document, DocumentHandlerError> {
    repository
        .find_by_id(id)
        .await
        .map_err(|e| DocumentHandlerError::persistence("load document", e))?
        .ok_or_else(|| DocumentHandlerError::document_not_found(id))
}
