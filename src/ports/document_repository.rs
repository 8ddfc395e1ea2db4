//! Document Repository Port - Persistence contract for the Document aggregate.
//!
//! Implementations store a document row and its versions and give back
//! fully reconstituted aggregates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::document::{
    AccessScope, Document, DocumentType, DocumentVersion, Tag, VersionNumber,
};
use crate::domain::foundation::{DocumentId, DomainError, RepositoryId};

/// Default number of documents per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Port for document persistence operations.
///
/// # Contract
///
/// Implementations must:
/// - Write the document and every version it holds in one atomic unit
/// - Never delete or renumber stored versions
/// - Reject `update` when the stored revision differs from
///   `document.expected_revision()` with `ErrorCode::ConcurrencyConflict`
/// - Restore documents through the trusted constructors
///   (`Document::reconstitute`, `DocumentVersion::reconstitute`)
///
/// # Usage
///
/// ```rust,ignore
/// let repo: &dyn DocumentRepository = get_repo();
///
/// let mut document = repo.find_by_id(id).await?.ok_or(not_found)?;
/// document.rollback_to_version(number)?;
/// repo.update(&document).await?;
/// ```
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Save a new document together with its versions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if:
    /// - A document with the same ID already exists
    /// - The database write fails
    async fn save(&self, document: &Document) -> Result<(), DomainError>;

    /// Update an existing document, inserting any newly appended versions.
    ///
    /// Stored versions only ever have their `unpublished_at` changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if:
    /// - The document doesn't exist (`DocumentNotFound`)
    /// - The stored revision moved on (`ConcurrencyConflict`)
    /// - The database write fails
    async fn update(&self, document: &Document) -> Result<(), DomainError>;

    /// Find a document by ID, including all of its versions.
    ///
    /// # Returns
    ///
    /// The document if found, None otherwise.
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DomainError>;

    /// List every document of a source repository, published or not.
    ///
    /// Ordered by `updated_at`, newest first.
    async fn find_by_repository_id(
        &self,
        repository_id: RepositoryId,
        options: &ListOptions,
    ) -> Result<DocumentPage, DomainError>;

    /// List published documents matching the filter.
    ///
    /// Document type and tag filters apply to the current version.
    /// Ordered by `updated_at`, newest first.
    async fn find_published(&self, filter: &DocumentFilter) -> Result<DocumentPage, DomainError>;

    /// All versions of a document ordered by number.
    ///
    /// Empty when the document doesn't exist.
    async fn find_versions_by_document_id(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<DocumentVersion>, DomainError>;

    /// A single version of a document.
    async fn find_version_by_number(
        &self,
        document_id: DocumentId,
        number: VersionNumber,
    ) -> Result<Option<DocumentVersion>, DomainError>;
}

/// Pagination options for listing documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Maximum number of results to return.
    pub limit: Option<u32>,

    /// Number of results to skip.
    pub offset: Option<u32>,
}

impl ListOptions {
    /// Create options for a paginated query. Pages start at 1.
    ///
    /// `per_page` is clamped to `1..=MAX_PAGE_SIZE` before the offset is
    /// computed, so consecutive pages never overlap or leave gaps.
    pub fn paginated(page: u32, per_page: u32) -> Self {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        Self {
            limit: Some(per_page),
            offset: Some(page.saturating_sub(1).saturating_mul(per_page)),
        }
    }

    /// Page size after applying the default and the ceiling.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// Filters for listing published documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    pub repository_id: Option<RepositoryId>,
    pub doc_type: Option<DocumentType>,
    pub access_scope: Option<AccessScope>,
    pub tag: Option<Tag>,
    pub options: ListOptions,
}

impl DocumentFilter {
    /// Returns true if a published document satisfies every set filter.
    pub fn matches(&self, document: &Document) -> bool {
        if !document.is_published() {
            return false;
        }
        if let Some(repository_id) = self.repository_id {
            if document.repository_id() != repository_id {
                return false;
            }
        }
        if let Some(scope) = self.access_scope {
            if document.access_scope() != scope {
                return false;
            }
        }
        let current = match document.current_version() {
            Some(version) => version,
            None => return false,
        };
        if let Some(doc_type) = self.doc_type {
            if current.doc_type() != doc_type {
                return false;
            }
        }
        match &self.tag {
            Some(tag) => current.tags().contains(tag),
            None => true,
        }
    }
}

/// One page of documents.
#[derive(Debug, Clone)]
pub struct DocumentPage {
    /// Documents in this page.
    pub items: Vec<Document>,

    /// Total number of matching documents.
    pub total: u64,
}

impl DocumentPage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Whether documents remain after this page.
    pub fn has_more(&self, options: &ListOptions) -> bool {
        u64::from(options.effective_offset()) + (self.items.len() as u64) < self.total
    }
}
