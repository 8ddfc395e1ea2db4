//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentRepository` - Persistence of the Document aggregate and its versions

mod document_repository;

pub use document_repository::{
    DocumentFilter, DocumentPage, DocumentRepository, ListOptions, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
