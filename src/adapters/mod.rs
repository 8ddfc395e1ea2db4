//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - Process-local repository for tests and the `memory` backend
//! - `postgres` - PostgreSQL repository via sqlx

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDocumentRepository;
pub use postgres::PostgresDocumentRepository;

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

use crate::config::{ConfigError, DatabaseBackend, DatabaseConfig};
use crate::ports::DocumentRepository;

/// Builds the document repository selected by the configuration.
///
/// For PostgreSQL this opens a pool with the configured limits and timeouts.
///
/// # Errors
///
/// Returns `ConfigError::ConnectionFailed` if the pool cannot connect.
pub async fn connect_repository(
    config: &DatabaseConfig,
) -> Result<Arc<dyn DocumentRepository>, ConfigError> {
    match config.backend {
        DatabaseBackend::Memory => {
            info!(backend = "memory", "Using in-memory document repository");
            Ok(Arc::new(InMemoryDocumentRepository::new()))
        }
        DatabaseBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .min_connections(config.min_connections)
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout())
                .idle_timeout(config.idle_timeout())
                .max_lifetime(config.max_lifetime())
                .connect(&config.url)
                .await
                .map_err(|e| ConfigError::ConnectionFailed(e.to_string()))?;

            info!(
                backend = "postgres",
                max_connections = config.max_connections,
                "Connected document repository"
            );
            Ok(Arc::new(PostgresDocumentRepository::new(pool)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_needs_no_database() {
        let repo = connect_repository(&DatabaseConfig::in_memory()).await.unwrap();
        let found = repo
            .find_by_id(crate::domain::foundation::DocumentId::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
