//! Storage configuration.

use serde::Deserialize;

/// State snapshot storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub path: Option<String>,
}
