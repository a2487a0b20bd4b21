//! Centralized error types for the board client.

use continuum_api::ApiError;
use continuum_storage::StorageError;
use thiserror::Error;

/// Main error type for board operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed cached data: {0}")]
    MalformedCache(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for board operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
