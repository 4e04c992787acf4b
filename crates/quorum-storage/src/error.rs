//! Error types for the drive API client.

use thiserror::Error;

/// Errors that can occur when talking to the drive gateway.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Gateway is unreachable.
    #[error("Storage gateway is unreachable at {host}")]
    Unreachable { host: String },

    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The file type cannot be exported as text.
    #[error("Export not supported for MIME type: {mime_type}")]
    UnsupportedExport { mime_type: String },

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for drive API operations.
pub type StorageResult<T> = Result<T, StorageError>;
