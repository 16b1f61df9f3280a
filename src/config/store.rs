//! Flat-file record store configuration.

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ConfigError;

/// Where the flat-file record set lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON-lines record file.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("patients.jsonl")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl StoreConfig {
    /// Validates the configured path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("store.path", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_patients_jsonl() {
        assert_eq!(StoreConfig::default().path, PathBuf::from("patients.jsonl"));
    }

    #[test]
    fn empty_path_fails_validation() {
        let config = StoreConfig {
            path: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }
}
