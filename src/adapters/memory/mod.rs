//! In-memory adapters - Process-local implementations of the persistence ports.
//!
//! Used by the integration tests and by the `memory` database backend.

mod document_repository;

pub use document_repository::InMemoryDocumentRepository;
