//! Application configuration.
//!
//! Type-safe configuration loaded from environment variables with the
//! `DERMASSIST` prefix (double underscore separates nested values, e.g.
//! `DERMASSIST_STORE__PATH=/var/lib/dermassist/patients.jsonl`). A `.env`
//! file is honored in development.

mod database;
mod error;
mod store;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use store::StoreConfig;

use serde::Deserialize;

use crate::domain::quiz::ScoringMode;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Flat-file record store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Optional relational backend; when set it replaces the flat file.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// How per-category answer history feeds the classifier.
    #[serde(default)]
    pub scoring: ScoringMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            database: None,
            scoring: ScoringMode::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the environment (and `.env` if present).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DERMASSIST")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        Ok(())
    }
}
