//! Document module - Runbook documents and their version history.
//!
//! # Module Organization
//!
//! - `aggregate` - The `Document` aggregate root (publish, rollback, unpublish)
//! - `version` - `DocumentVersion` entity and its immutable snapshot
//! - `value_objects` - Titles, sources, content, version numbers, revisions
//! - `metadata` - Tags and variable definitions
//! - `publish_state` - Published/unpublished state machine
//! - `errors` - Business-rule errors

mod aggregate;
mod errors;
mod metadata;
mod publish_state;
mod value_objects;
pub(crate) mod version;

pub use aggregate::Document;
pub use errors::DocumentError;
pub use metadata::{
    Category, Tag, VariableDefinition, VariableType, MAX_CATEGORY_LEN, MAX_TAG_LEN,
    MAX_VARIABLE_LABEL_LEN,
};
pub(crate) use metadata::VariableRecord;
pub use publish_state::PublishState;
pub use value_objects::{
    AccessScope, CommitHash, DocumentContent, DocumentSource, DocumentType, FilePath, Revision,
    Title, VersionNumber, MAX_COMMIT_HASH_LEN, MAX_CONTENT_BYTES, MAX_FILE_PATH_LEN,
    MAX_TITLE_LEN,
};
pub use version::{
    DocumentVersion, VersionSnapshot, MAX_TAGS_PER_VERSION, MAX_VARIABLES_PER_VERSION,
};
