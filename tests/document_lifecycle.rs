//! Integration tests for the document lifecycle.
//!
//! These tests drive the use-case handlers end to end:
//! 1. Create a document and publish its first version
//! 2. Append versions, roll back, republish, unpublish
//! 3. Persist every step through the in-memory repository
//!
//! Uses the in-memory adapter so no database is required.

use std::collections::HashSet;
use std::sync::Arc;

use runbook_docs::adapters::InMemoryDocumentRepository;
use runbook_docs::application::{
    CreateDocumentCommand, CreateDocumentHandler, DocumentHandlerError, DocumentView,
    GetDocumentVersionsHandler, GetDocumentVersionsQuery, ListDocumentsHandler,
    ListDocumentsQuery, PublishDocumentVersionCommand, PublishDocumentVersionHandler,
    RollbackDocumentVersionCommand, RollbackDocumentVersionHandler, UnpublishDocumentCommand,
    UnpublishDocumentHandler, UpdateDocumentCommand, UpdateDocumentHandler, VersionInput,
};
use runbook_docs::domain::document::{AccessScope, Document};
use runbook_docs::domain::foundation::{
    CommandMetadata, DocumentId, ErrorCode, RepositoryId, UserId,
};
use runbook_docs::ports::{DocumentRepository, MAX_PAGE_SIZE};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    repo: Arc<InMemoryDocumentRepository>,
    repository_id: RepositoryId,
}

impl Harness {
    fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryDocumentRepository::new()),
            repository_id: RepositoryId::new(),
        }
    }

    fn metadata() -> CommandMetadata {
        CommandMetadata::new(UserId::new("admin").unwrap()).with_correlation_id("it-correlation")
    }

    fn version(title: &str, commit: &str, content: &str) -> VersionInput {
        VersionInput {
            file_path: "docs/a.md".to_string(),
            commit_hash: commit.to_string(),
            title: title.to_string(),
            doc_type: "procedure".to_string(),
            tags: vec!["ops:restart".to_string()],
            variables: Vec::new(),
            content: content.to_string(),
        }
    }

    async fn create(&self, title: &str) -> Result<DocumentView, DocumentHandlerError> {
        CreateDocumentHandler::new(self.repo.clone())
            .handle(
                CreateDocumentCommand {
                    repository_id: self.repository_id.to_string(),
                    owner: "admin".to_string(),
                    access_scope: "public".to_string(),
                    is_auto_update: false,
                    version: Self::version(title, "abc1234", "x"),
                },
                Self::metadata(),
            )
            .await
    }

    async fn update(&self, id: DocumentId, title: &str) -> DocumentView {
        UpdateDocumentHandler::new(self.repo.clone())
            .handle(
                UpdateDocumentCommand {
                    document_id: id.to_string(),
                    version: Self::version(title, "def5678", "y"),
                },
                Self::metadata(),
            )
            .await
            .unwrap()
    }

    async fn rollback(&self, id: DocumentId, n: i64) -> Result<DocumentView, DocumentHandlerError> {
        RollbackDocumentVersionHandler::new(self.repo.clone())
            .handle(
                RollbackDocumentVersionCommand {
                    document_id: id.to_string(),
                    version_number: n,
                },
                Self::metadata(),
            )
            .await
    }

    async fn publish(&self, id: DocumentId, n: i64) -> Result<DocumentView, DocumentHandlerError> {
        PublishDocumentVersionHandler::new(self.repo.clone())
            .handle(
                PublishDocumentVersionCommand {
                    document_id: id.to_string(),
                    version_number: n,
                },
                Self::metadata(),
            )
            .await
    }

    async fn unpublish(&self, id: DocumentId) -> DocumentView {
        UnpublishDocumentHandler::new(self.repo.clone())
            .handle(
                UnpublishDocumentCommand {
                    document_id: id.to_string(),
                },
                Self::metadata(),
            )
            .await
            .unwrap()
    }

    async fn stored(&self, id: DocumentId) -> Document {
        self.repo.find_by_id(id).await.unwrap().unwrap()
    }
}

fn current_number(view: &DocumentView) -> u32 {
    view.current_version
        .as_ref()
        .map(|v| v.version_number.as_u32())
        .unwrap_or(0)
}

// =============================================================================
// Lifecycle Scenarios
// =============================================================================

#[tokio::test]
async fn create_publishes_version_one() {
    let h = Harness::new();

    let view = h.create("A").await.unwrap();

    assert!(view.is_published);
    assert_eq!(view.version_count, 1);
    assert_eq!(current_number(&view), 1);
    assert!(view.current_version.unwrap().is_current_version);
}

#[tokio::test]
async fn update_appends_version_two() {
    let h = Harness::new();
    let created = h.create("A").await.unwrap();

    let view = h.update(created.id, "A2").await;

    assert_eq!(view.version_count, 2);
    assert_eq!(current_number(&view), 2);
    assert_eq!(view.current_version.unwrap().title, "A2");
}

#[tokio::test]
async fn rollback_returns_to_version_one_without_appending() {
    let h = Harness::new();
    let created = h.create("A").await.unwrap();
    h.update(created.id, "A2").await;

    let view = h.rollback(created.id, 1).await.unwrap();

    assert_eq!(current_number(&view), 1);
    assert_eq!(view.current_version.unwrap().title, "A");
    assert_eq!(view.version_count, 2);
    assert_eq!(h.stored(created.id).await.versions().len(), 2);
}

#[tokio::test]
async fn publishing_current_version_changes_nothing() {
    let h = Harness::new();
    let created = h.create("A").await.unwrap();
    let before = h.update(created.id, "A2").await;

    let after = h.publish(created.id, 2).await.unwrap();

    assert_eq!(after, before);
    assert_eq!(h.stored(created.id).await.versions().len(), 2);
}

#[tokio::test]
async fn rollback_before_publish_is_rejected() {
    let h = Harness::new();
    let document = Document::new(
        DocumentId::new(),
        h.repository_id,
        UserId::new("admin").unwrap(),
        AccessScope::Public,
    )
    .unwrap();
    h.repo.save(&document).await.unwrap();

    let err = h.rollback(document.id(), 1).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotPublished);
    assert_eq!(
        err.to_string(),
        "Conflict: cannot rollback unpublished document"
    );
}

#[tokio::test]
async fn empty_title_is_rejected_before_anything_is_stored() {
    let h = Harness::new();

    let err = h.create("").await.unwrap_err();

    assert_eq!(err.invalid_fields(), vec!["title"]);
    assert!(h.repo.is_empty().await);
}

// =============================================================================
// Publish / Unpublish Cycles
// =============================================================================

#[tokio::test]
async fn unpublish_then_update_continues_numbering() {
    let h = Harness::new();
    let created = h.create("A").await.unwrap();
    h.update(created.id, "A2").await;

    let unpublished = h.unpublish(created.id).await;
    assert!(!unpublished.is_published);
    assert!(unpublished.current_version.is_none());

    let view = h.update(created.id, "B").await;
    assert!(view.is_published);
    assert_eq!(current_number(&view), 3);
    assert_eq!(view.version_count, 3);
}

#[tokio::test]
async fn republishing_after_unpublish_appends_copy() {
    let h = Harness::new();
    let created = h.create("A").await.unwrap();
    h.update(created.id, "A2").await;
    h.unpublish(created.id).await;

    let view = h.publish(created.id, 1).await.unwrap();

    assert!(view.is_published);
    assert_eq!(current_number(&view), 3);
    assert_eq!(view.current_version.unwrap().title, "A");

    let history = GetDocumentVersionsHandler::new(h.repo.clone())
        .handle(GetDocumentVersionsQuery {
            document_id: created.id.to_string(),
        })
        .await
        .unwrap();
    let published: Vec<bool> = history.iter().map(|v| v.is_published).collect();
    assert_eq!(published, vec![true, false, true]);
}

#[tokio::test]
async fn rollback_to_unpublished_version_is_rejected() {
    let h = Harness::new();
    let created = h.create("A").await.unwrap();
    h.update(created.id, "A2").await;
    h.unpublish(created.id).await;
    h.update(created.id, "B").await;

    let err = h.rollback(created.id, 2).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::VersionUnpublished);
}

#[tokio::test]
async fn listing_hides_unpublished_documents() {
    let h = Harness::new();
    let kept = h.create("A").await.unwrap();
    let withdrawn = h.create("B").await.unwrap();
    h.unpublish(withdrawn.id).await;

    let list = ListDocumentsHandler::new(h.repo.clone())
        .handle(ListDocumentsQuery {
            repository_id: Some(h.repository_id.to_string()),
            tag: Some("ops:restart".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.items[0].id, kept.id);
}

#[tokio::test]
async fn oversized_pages_visit_every_document_once() {
    let h = Harness::new();
    let count = MAX_PAGE_SIZE as usize + 50;
    for i in 0..count {
        h.create(&format!("Doc {}", i)).await.unwrap();
    }
    let handler = ListDocumentsHandler::new(h.repo.clone());

    let mut seen = HashSet::new();
    let mut page = 1;
    loop {
        let list = handler
            .handle(ListDocumentsQuery::paginated(page, 500))
            .await
            .unwrap();
        assert_eq!(list.total, count as u64);
        for item in &list.items {
            assert!(seen.insert(item.id), "document listed twice");
        }
        if !list.has_more {
            break;
        }
        page += 1;
    }

    assert_eq!(page, 2);
    assert_eq!(seen.len(), count);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_writers_cannot_overwrite_each_other() {
    let h = Harness::new();
    let created = h.create("A").await.unwrap();

    let mut first = h.stored(created.id).await;
    let mut second = h.stored(created.id).await;

    first.enable_auto_update();
    h.repo.update(&first).await.unwrap();

    second.update_access_scope(AccessScope::Private);
    let err = h.repo.update(&second).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConcurrencyConflict);

    let stored = h.stored(created.id).await;
    assert!(stored.is_auto_update());
    assert_eq!(stored.access_scope(), AccessScope::Public);
}
