//! Error types for the settings store.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Key is not one of the known settings keys.
    #[error("unknown settings key: {0}")]
    UnknownKey(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Blocking task failed to complete.
    #[error("background task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
