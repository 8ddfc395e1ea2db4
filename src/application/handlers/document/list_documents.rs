//! ListDocumentsHandler - Query handler for browsing published documents.

use std::sync::Arc;

use super::input::{parse_access_scope, parse_doc_type, parse_repository_id, parse_tag};
use super::{DocumentHandlerError, DocumentList};
use crate::domain::foundation::ValidationErrors;
use crate::ports::{DocumentFilter, DocumentRepository, ListOptions, DEFAULT_PAGE_SIZE};

/// Query for published documents. Every filter is optional.
#[derive(Debug, Clone, Default)]
pub struct ListDocumentsQuery {
    pub repository_id: Option<String>,
    pub doc_type: Option<String>,
    pub access_scope: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListDocumentsQuery {
    /// Create a paginated query with no filters.
    pub fn paginated(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Default::default()
        }
    }

    /// Build the repository filter, recording invalid filter values.
    fn to_filter(&self, errors: &mut ValidationErrors) -> DocumentFilter {
        let options = match (self.page, self.per_page) {
            (Some(page), per_page) => {
                ListOptions::paginated(page, per_page.unwrap_or(DEFAULT_PAGE_SIZE))
            }
            (None, Some(per_page)) => ListOptions::paginated(1, per_page),
            _ => ListOptions::default(),
        };

        DocumentFilter {
            repository_id: self
                .repository_id
                .as_deref()
                .and_then(|raw| parse_repository_id(raw, errors)),
            doc_type: self
                .doc_type
                .as_deref()
                .and_then(|raw| parse_doc_type(raw, errors)),
            access_scope: self
                .access_scope
                .as_deref()
                .and_then(|raw| parse_access_scope(raw, errors)),
            tag: self.tag.as_deref().and_then(|raw| parse_tag(raw, errors)),
            options,
        }
    }
}

/// Handler for listing published documents.
pub struct ListDocumentsHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListDocumentsQuery) -> Result<DocumentList, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let filter = query.to_filter(&mut errors);
        errors.into_result()?;

        let page = self
            .repository
            .find_published(&filter)
            .await
            .map_err(|e| DocumentHandlerError::persistence("list documents", e))?;

        Ok(DocumentList::from_page(&page, &filter.options))
    }
}
