//! ListDocumentsByRepositoryHandler - Query handler for all documents of a source repository.

use std::sync::Arc;

use super::input::parse_repository_id;
use super::{DocumentHandlerError, DocumentList};
use crate::domain::foundation::ValidationErrors;
use crate::ports::{DocumentRepository, ListOptions, DEFAULT_PAGE_SIZE};

/// Query for the documents of one repository, published or not.
#[derive(Debug, Clone)]
pub struct ListDocumentsByRepositoryQuery {
    pub repository_id: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListDocumentsByRepositoryQuery {
    fn to_list_options(&self) -> ListOptions {
        match (self.page, self.per_page) {
            (Some(page), per_page) => {
                ListOptions::paginated(page, per_page.unwrap_or(DEFAULT_PAGE_SIZE))
            }
            (None, Some(per_page)) => ListOptions::paginated(1, per_page),
            _ => ListOptions::default(),
        }
    }
}

/// Handler for listing a repository's documents.
pub struct ListDocumentsByRepositoryHandler {
    repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsByRepositoryHandler {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListDocumentsByRepositoryQuery,
    ) -> Result<DocumentList, DocumentHandlerError> {
        let mut errors = ValidationErrors::new();
        let repository_id =
            parse_repository_id(&query.repository_id, &mut errors).ok_or(errors)?;
        let options = query.to_list_options();

        let page = self
            .repository
            .find_by_repository_id(repository_id, &options)
            .await
            .map_err(|e| DocumentHandlerError::persistence("list documents", e))?;

        Ok(DocumentList::from_page(&page, &options))
    }
}
