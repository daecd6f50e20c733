//! # Store Errors
//!
//! Error types for the score store.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failures. All of them are fatal to the request that hit them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database path cannot be used as a file
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    /// Filesystem error while preparing the database location
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the embedded database
    #[error("Store database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidPath(_) => "HIGHSCORES_STORE_INVALID_PATH",
            StoreError::Io(_) => "HIGHSCORES_STORE_IO",
            StoreError::Database(_) => "HIGHSCORES_STORE_DATABASE",
        }
    }
}
