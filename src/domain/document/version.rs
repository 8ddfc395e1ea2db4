//! DocumentVersion entity - One immutable content snapshot of a document.
//!
//! The snapshot (source, title, type, tags, variables, content) is fixed at
//! construction. Only the publish lifecycle (`unpublished_at`) changes later.
//! Whether a version is *current* is owned by the `Document` aggregate.

use std::collections::{BTreeSet, HashSet};

use super::{
    DocumentContent, DocumentError, DocumentSource, DocumentType, Tag, Title, VariableDefinition,
    VersionNumber,
};
use crate::domain::foundation::{DocumentId, Timestamp, ValidationError, VersionId};

pub const MAX_TAGS_PER_VERSION: usize = 32;
pub const MAX_VARIABLES_PER_VERSION: usize = 50;

/// The immutable content of a version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionSnapshot {
    source: DocumentSource,
    title: Title,
    doc_type: DocumentType,
    tags: BTreeSet<Tag>,
    variables: Vec<VariableDefinition>,
    content: DocumentContent,
}

impl VersionSnapshot {
    /// Bundles already validated value objects.
    ///
    /// Collection-level rules (counts, unique variable names) are checked
    /// when the snapshot becomes a `DocumentVersion`.
    pub fn new(
        source: DocumentSource,
        title: Title,
        doc_type: DocumentType,
        tags: BTreeSet<Tag>,
        variables: Vec<VariableDefinition>,
        content: DocumentContent,
    ) -> Self {
        Self {
            source,
            title,
            doc_type,
            tags,
            variables,
            content,
        }
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.tags.len() > MAX_TAGS_PER_VERSION {
            return Err(ValidationError::out_of_range(
                "tags",
                0,
                MAX_TAGS_PER_VERSION as i64,
                self.tags.len() as i64,
            ));
        }
        if self.variables.len() > MAX_VARIABLES_PER_VERSION {
            return Err(ValidationError::out_of_range(
                "variables",
                0,
                MAX_VARIABLES_PER_VERSION as i64,
                self.variables.len() as i64,
            ));
        }
        let mut seen = HashSet::new();
        for (index, variable) in self.variables.iter().enumerate() {
            if !seen.insert(variable.name()) {
                return Err(ValidationError::invalid_format(
                    format!("variables[{}].name", index),
                    format!("duplicate variable name '{}'", variable.name()),
                ));
            }
        }
        Ok(())
    }
}

/// One entry in a document's append-only version history.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVersion {
    id: VersionId,
    document_id: DocumentId,
    number: VersionNumber,
    snapshot: VersionSnapshot,
    published_at: Timestamp,
    unpublished_at: Option<Timestamp>,
}

impl DocumentVersion {
    // ════════════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════════════

    /// Creates a freshly published version.
    ///
    /// Returns the first rule violation found, naming the offending field.
    pub fn new(
        document_id: DocumentId,
        number: VersionNumber,
        snapshot: VersionSnapshot,
    ) -> Result<Self, DocumentError> {
        if document_id.is_nil() {
            return Err(ValidationError::empty_field("document_id").into());
        }
        snapshot.validate()?;

        Ok(Self {
            id: VersionId::new(),
            document_id,
            number,
            snapshot,
            published_at: Timestamp::now(),
            unpublished_at: None,
        })
    }

    /// Reconstitutes a version from persistence.
    ///
    /// Trusted path: stored state is restored as-is without re-checking
    /// business rules.
    pub fn reconstitute(
        id: VersionId,
        document_id: DocumentId,
        number: VersionNumber,
        snapshot: VersionSnapshot,
        published_at: Timestamp,
        unpublished_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            document_id,
            number,
            snapshot,
            published_at,
            unpublished_at,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn number(&self) -> VersionNumber {
        self.number
    }

    pub fn snapshot(&self) -> &VersionSnapshot {
        &self.snapshot
    }

    pub fn source(&self) -> &DocumentSource {
        self.snapshot.source()
    }

    pub fn title(&self) -> &Title {
        self.snapshot.title()
    }

    pub fn doc_type(&self) -> DocumentType {
        self.snapshot.doc_type()
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        self.snapshot.tags()
    }

    pub fn variables(&self) -> &[VariableDefinition] {
        self.snapshot.variables()
    }

    pub fn content(&self) -> &DocumentContent {
        self.snapshot.content()
    }

    pub fn published_at(&self) -> Timestamp {
        self.published_at
    }

    pub fn unpublished_at(&self) -> Option<Timestamp> {
        self.unpublished_at
    }

    /// True until the version is unpublished.
    pub fn is_published(&self) -> bool {
        self.unpublished_at.is_none()
    }

    // ════════════════════════════════════════════════════════════════════════════════
    // Mutations
    // ════════════════════════════════════════════════════════════════════════════════

    /// Marks this version as unpublished. Irreversible.
    pub(crate) fn unpublish(&mut self) -> Result<(), DocumentError> {
        if self.unpublished_at.is_some() {
            return Err(DocumentError::AlreadyUnpublished(self.number));
        }
        self.unpublished_at = Some(Timestamp::now());
        Ok(())
    }
}
