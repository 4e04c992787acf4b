//! Error types for the sync pipeline.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during crawling, indexing, and enrichment.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] quorum_db::DbError),

    #[error("Config error: {0}")]
    Config(#[from] quorum_config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Enrichment error: {0}")]
    Enrichment(String),
}
