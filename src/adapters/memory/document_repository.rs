//! In-memory implementation of DocumentRepository.
//!
//! Keeps whole aggregates in a map guarded by a tokio `RwLock`. Enforces the
//! same revision check as the PostgreSQL adapter so concurrency behaviour can
//! be exercised without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::document::{Document, DocumentVersion, VersionNumber};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, RepositoryId};
use crate::ports::{DocumentFilter, DocumentPage, DocumentRepository, ListOptions};

/// In-memory document store.
///
/// # Example
///
/// ```ignore
/// let repo = Arc::new(InMemoryDocumentRepository::new());
/// repo.save(&document).await?;
/// assert_eq!(repo.len().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: RwLock<HashMap<DocumentId, Document>>,
}

impl InMemoryDocumentRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn paginate(mut matching: Vec<Document>, options: &ListOptions) -> DocumentPage {
        matching.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(options.effective_offset() as usize)
            .take(options.effective_limit() as usize)
            .collect();
        DocumentPage { items, total }
    }
}

/// Stored copy with its revision recorded as persisted.
fn persisted_copy(document: &Document) -> Document {
    let mut stored = document.clone();
    stored.mark_persisted();
    stored
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&document.id()) {
            return Err(DomainError::conflict(format!(
                "Document {} already exists",
                document.id()
            )));
        }
        documents.insert(document.id(), persisted_copy(document));
        Ok(())
    }

    async fn update(&self, document: &Document) -> Result<(), DomainError> {
        let mut documents = self.documents.write().await;
        let stored = documents.get(&document.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document {} not found", document.id()),
            )
        })?;

        if Some(stored.revision()) != document.expected_revision() {
            warn!(
                document_id = %document.id(),
                stored_revision = %stored.revision(),
                "Rejected update of stale document"
            );
            return Err(DomainError::conflict(
                "Document revision mismatch - another update occurred",
            ));
        }

        documents.insert(document.id(), persisted_copy(document));
        Ok(())
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DomainError> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn find_by_repository_id(
        &self,
        repository_id: RepositoryId,
        options: &ListOptions,
    ) -> Result<DocumentPage, DomainError> {
        let matching = self
            .documents
            .read()
            .await
            .values()
            .filter(|d| d.repository_id() == repository_id)
            .cloned()
            .collect();
        Ok(Self::paginate(matching, options))
    }

    async fn find_published(&self, filter: &DocumentFilter) -> Result<DocumentPage, DomainError> {
        let matching = self
            .documents
            .read()
            .await
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        Ok(Self::paginate(matching, &filter.options))
    }

    async fn find_versions_by_document_id(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<DocumentVersion>, DomainError> {
        Ok(self
            .documents
            .read()
            .await
            .get(&document_id)
            .map(|d| d.versions().to_vec())
            .unwrap_or_default())
    }

    async fn find_version_by_number(
        &self,
        document_id: DocumentId,
        number: VersionNumber,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        Ok(self
            .documents
            .read()
            .await
            .get(&document_id)
            .and_then(|d| d.version(number).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::version::test_support::snapshot;
    use crate::domain::document::AccessScope;
    use crate::domain::foundation::UserId;

    fn document(repository_id: RepositoryId) -> Document {
        Document::new(
            DocumentId::new(),
            repository_id,
            UserId::new("admin").unwrap(),
            AccessScope::Public,
        )
        .unwrap()
    }

    fn published(repository_id: RepositoryId) -> Document {
        let mut doc = document(repository_id);
        doc.publish(snapshot("A", "abc1234", "x")).unwrap();
        doc
    }

    #[tokio::test]
    async fn save_then_find_returns_persisted_copy() {
        let repo = InMemoryDocumentRepository::new();
        let doc = published(RepositoryId::new());

        repo.save(&doc).await.unwrap();
        let found = repo.find_by_id(doc.id()).await.unwrap().unwrap();

        assert_eq!(found.id(), doc.id());
        assert_eq!(found.versions().len(), 1);
        assert_eq!(found.expected_revision(), Some(doc.revision()));
    }

    #[tokio::test]
    async fn save_rejects_duplicate_id() {
        let repo = InMemoryDocumentRepository::new();
        let doc = document(RepositoryId::new());
        repo.save(&doc).await.unwrap();

        let err = repo.save(&doc).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let repo = InMemoryDocumentRepository::new();
        let doc = document(RepositoryId::new());

        let err = repo.update(&doc).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DocumentNotFound);
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let repo = InMemoryDocumentRepository::new();
        let doc = published(RepositoryId::new());
        repo.save(&doc).await.unwrap();

        let mut first = repo.find_by_id(doc.id()).await.unwrap().unwrap();
        let mut second = repo.find_by_id(doc.id()).await.unwrap().unwrap();

        first.enable_auto_update();
        repo.update(&first).await.unwrap();

        second.publish(snapshot("B", "def5678", "y")).unwrap();
        let err = repo.update(&second).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        let stored = repo.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.versions().len(), 1);
        assert!(stored.is_auto_update());
    }

    #[tokio::test]
    async fn find_by_repository_includes_unpublished() {
        let repo = InMemoryDocumentRepository::new();
        let repository_id = RepositoryId::new();
        repo.save(&document(repository_id)).await.unwrap();
        repo.save(&published(repository_id)).await.unwrap();
        repo.save(&published(RepositoryId::new())).await.unwrap();

        let page = repo
            .find_by_repository_id(repository_id, &ListOptions::default())
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn find_published_paginates() {
        let repo = InMemoryDocumentRepository::new();
        for _ in 0..3 {
            repo.save(&published(RepositoryId::new())).await.unwrap();
        }
        repo.save(&document(RepositoryId::new())).await.unwrap();

        let filter = DocumentFilter {
            options: ListOptions::paginated(1, 2),
            ..Default::default()
        };
        let page = repo.find_published(&filter).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more(&filter.options));
    }

    #[tokio::test]
    async fn version_lookups() {
        let repo = InMemoryDocumentRepository::new();
        let doc = published(RepositoryId::new());
        repo.save(&doc).await.unwrap();

        let versions = repo.find_versions_by_document_id(doc.id()).await.unwrap();
        assert_eq!(versions.len(), 1);

        let found = repo
            .find_version_by_number(doc.id(), VersionNumber::first())
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = repo
            .find_version_by_number(doc.id(), VersionNumber::new(9).unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());

        assert!(repo
            .find_versions_by_document_id(DocumentId::new())
            .await
            .unwrap()
            .is_empty());
    }
}
