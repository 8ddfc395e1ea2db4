//! Read-only projections returned by the document handlers.

use serde::Serialize;

use crate::domain::document::{
    AccessScope, Document, DocumentType, DocumentVersion, VariableDefinition, VersionNumber,
};
use crate::domain::foundation::{DocumentId, RepositoryId, Timestamp, VersionId};
use crate::ports::{DocumentPage, ListOptions};

/// Projection of a single version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentVersionView {
    pub id: VersionId,
    pub document_id: DocumentId,
    pub version_number: VersionNumber,
    pub file_path: String,
    pub commit_hash: String,
    pub title: String,
    pub doc_type: DocumentType,
    pub tags: Vec<String>,
    pub variables: Vec<VariableDefinition>,
    pub content: String,
    pub content_checksum: String,
    pub published_at: Timestamp,
    pub unpublished_at: Option<Timestamp>,
    pub is_published: bool,
    pub is_current_version: bool,
}

impl DocumentVersionView {
    pub fn new(version: &DocumentVersion, is_current_version: bool) -> Self {
        Self {
            id: version.id(),
            document_id: version.document_id(),
            version_number: version.number(),
            file_path: version.source().file_path().as_str().to_string(),
            commit_hash: version.source().commit_hash().as_str().to_string(),
            title: version.title().as_str().to_string(),
            doc_type: version.doc_type(),
            tags: version.tags().iter().map(ToString::to_string).collect(),
            variables: version.variables().to_vec(),
            content: version.content().raw().to_string(),
            content_checksum: version.content().checksum().to_string(),
            published_at: version.published_at(),
            unpublished_at: version.unpublished_at(),
            is_published: version.is_published(),
            is_current_version,
        }
    }

    /// Projects a version of `document`, flagging it if it is current.
    pub fn of(document: &Document, version: &DocumentVersion) -> Self {
        Self::new(version, document.is_current(version.number()))
    }
}

/// Projection of a document with its current version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    pub id: DocumentId,
    pub repository_id: RepositoryId,
    pub owner: String,
    pub access_scope: AccessScope,
    pub is_published: bool,
    pub is_auto_update: bool,
    pub revision: u64,
    pub version_count: usize,
    pub latest_version_number: Option<VersionNumber>,
    pub current_version: Option<DocumentVersionView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Document> for DocumentView {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            repository_id: document.repository_id(),
            owner: document.owner().as_str().to_string(),
            access_scope: document.access_scope(),
            is_published: document.is_published(),
            is_auto_update: document.is_auto_update(),
            revision: document.revision().as_u64(),
            version_count: document.versions().len(),
            latest_version_number: document.latest_version_number(),
            current_version: document
                .current_version()
                .map(|v| DocumentVersionView::new(v, true)),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

/// Paginated list of documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentList {
    /// Documents in this page.
    pub items: Vec<DocumentView>,

    /// Total number of matching documents.
    pub total: u64,

    /// Whether there are more results.
    pub has_more: bool,
}

impl DocumentList {
    pub(crate) fn from_page(page: &DocumentPage, options: &ListOptions) -> Self {
        Self {
            items: page.items.iter().map(DocumentView::from).collect(),
            total: page.total,
            has_more: page.has_more(options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::version::test_support::snapshot;
    use crate::domain::foundation::UserId;

    fn published_twice() -> Document {
        let mut doc = Document::new(
            DocumentId::new(),
            RepositoryId::new(),
            UserId::new("admin").unwrap(),
            AccessScope::Public,
        )
        .unwrap();
        doc.publish(snapshot("A", "abc1234", "x")).unwrap();
        doc.publish(snapshot("A2", "def5678", "y")).unwrap();
        doc
    }

    #[test]
    fn current_flag_is_derived_from_pointer() {
        let doc = published_twice();

        let flags: Vec<bool> = doc
            .versions()
            .iter()
            .map(|v| DocumentVersionView::of(&doc, v).is_current_version)
            .collect();

        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn document_view_carries_current_version() {
        let doc = published_twice();

        let view = DocumentView::from(&doc);

        assert!(view.is_published);
        assert_eq!(view.version_count, 2);
        let current = view.current_version.unwrap();
        assert_eq!(current.title, "A2");
        assert_eq!(current.version_number.as_u32(), 2);
    }

    #[test]
    fn views_serialize_numbers_and_timestamps() {
        let doc = published_twice();
        let json = serde_json::to_value(DocumentView::from(&doc)).unwrap();

        assert_eq!(json["current_version"]["version_number"], 2);
        assert_eq!(json["access_scope"], "public");
        assert_eq!(json["current_version"]["doc_type"], "procedure");
        let created = json["created_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
        assert_eq!(json["id"], doc.id().to_string());
    }
}
