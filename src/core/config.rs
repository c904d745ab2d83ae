// src/core/config.rs

use crate::core::common::DbError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunables for the engine.
///
/// Supports loading from a TOML file and provides sensible default values;
/// every field is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Row capacity a fresh table starts with; the row vector doubles when
    /// full.
    /// Default: 10
    #[serde(default = "default_initial_table_capacity")]
    pub initial_table_capacity: usize,

    /// Table slots the catalog starts with.
    /// Default: 10
    #[serde(default = "default_initial_catalog_capacity")]
    pub initial_catalog_capacity: usize,

    /// Undo records a fresh transaction reserves space for.
    /// Default: 100
    #[serde(default = "default_undo_log_capacity")]
    pub undo_log_capacity: usize,
}

// Default value functions for serde
fn default_initial_table_capacity() -> usize {
    10
}
fn default_initial_catalog_capacity() -> usize {
    10
}
fn default_undo_log_capacity() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_table_capacity: default_initial_table_capacity(),
            initial_catalog_capacity: default_initial_catalog_capacity(),
            undo_log_capacity: default_undo_log_capacity(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// If the specified file does not exist, default configuration values
    /// are returned.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Configuration` if the file cannot be read or if
    /// parsing fails.
    pub fn load_from_file(path: &Path) -> Result<Self, DbError> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| {
                DbError::Configuration(format!(
                    "failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DbError::Configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
