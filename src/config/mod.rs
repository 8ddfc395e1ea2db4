//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RUNBOOK_DOCS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use runbook_docs::config::AppConfig;
//!
//! # async fn run() -> Result<(), runbook_docs::config::ConfigError> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! config.logging.init()?;
//!
//! let repository = runbook_docs::adapters::connect_repository(&config.database).await?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;
mod logging;

pub use database::{DatabaseBackend, DatabaseConfig};
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Document store configuration (backend, PostgreSQL pool)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RUNBOOK_DOCS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RUNBOOK_DOCS__DATABASE__URL=...` -> `database.url = ...`
    /// - `RUNBOOK_DOCS__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RUNBOOK_DOCS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
