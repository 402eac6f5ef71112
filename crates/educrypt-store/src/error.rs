//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Value serialization/deserialization error.
    #[error("serialization error for {key}: {message}")]
    Serialization { key: String, message: String },

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// The blocking task running a database call failed.
    #[error("background task failed: {0}")]
    Task(String),

    /// The backend refused the operation (injected faults, read-only media).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
