//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDocumentRepository` - Documents and their versions, written transactionally
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE runbook_documents (
//!     id              UUID PRIMARY KEY,
//!     repository_id   UUID NOT NULL,
//!     owner           TEXT NOT NULL,
//!     access_scope    TEXT NOT NULL,
//!     is_published    BOOLEAN NOT NULL,
//!     is_auto_update  BOOLEAN NOT NULL,
//!     current_version INTEGER,
//!     revision        BIGINT NOT NULL,
//!     created_at      TIMESTAMPTZ NOT NULL,
//!     updated_at      TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE runbook_document_versions (
//!     id               UUID PRIMARY KEY,
//!     document_id      UUID NOT NULL REFERENCES runbook_documents (id),
//!     version_number   INTEGER NOT NULL,
//!     file_path        TEXT NOT NULL,
//!     commit_hash      TEXT NOT NULL,
//!     title            TEXT NOT NULL,
//!     doc_type         TEXT NOT NULL,
//!     tags             JSONB NOT NULL,
//!     variables        JSONB NOT NULL,
//!     content          TEXT NOT NULL,
//!     content_checksum TEXT NOT NULL,
//!     published_at     TIMESTAMPTZ NOT NULL,
//!     unpublished_at   TIMESTAMPTZ,
//!     UNIQUE (document_id, version_number)
//! );
//! ```

mod document_repository;

pub use document_repository::PostgresDocumentRepository;
