//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod document;

pub use document::{
    // Commands
    CreateDocumentCommand, CreateDocumentHandler,
    PublishDocumentVersionCommand, PublishDocumentVersionHandler,
    RollbackDocumentVersionCommand, RollbackDocumentVersionHandler,
    UnpublishDocumentCommand, UnpublishDocumentHandler,
    UpdateDocumentCommand, UpdateDocumentHandler,
    UpdateDocumentMetadataCommand, UpdateDocumentMetadataHandler,
    // Queries
    GetDocumentHandler, GetDocumentQuery,
    GetDocumentVersionHandler, GetDocumentVersionQuery,
    GetDocumentVersionsHandler, GetDocumentVersionsQuery,
    ListDocumentsByRepositoryHandler, ListDocumentsByRepositoryQuery,
    ListDocumentsHandler, ListDocumentsQuery,
    // Input and projections
    DocumentHandlerError, DocumentList, DocumentVersionView, DocumentView, VariableInput,
    VersionInput,
};
