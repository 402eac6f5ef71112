//! Error types for the issuer API.

use educrypt_core::{CoreError, ValidationError};
use educrypt_store::StoreError;
use thiserror::Error;

/// Key Manager failures. Each is fatal to the operation that hit it.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Generating a fresh key failed (entropy or library error).
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// The new key could not be written to storage.
    #[error("key persistence failed: {0}")]
    KeyPersistenceFailed(#[source] StoreError),

    /// The stored key could not be read or parsed.
    #[error("key load failed: {0}")]
    KeyLoadFailed(String),

    /// No key is stored and the operation does not create one.
    #[error("no issuer key exists yet")]
    NoKey,

    /// Signing or verification with a loaded key failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CoreError),
}

/// Credential Ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage read or write failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A persisted log exists but cannot be parsed.
    #[error("log {slot} is corrupt: {message}")]
    Corrupt { slot: &'static str, message: String },
}

/// Issuance flow failures.
#[derive(Debug, Error)]
pub enum IssueError {
    /// The record failed field validation; nothing was written.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Key loading, creation or signing failed; nothing was written.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// A ledger step failed before any log was changed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The hash reached the snapshot log but the credential log append
    /// failed. A pending marker remains for [`crate::Issuer::recover`].
    #[error("credential {hash} partially recorded: snapshot updated, credential log not: {source}")]
    PartiallyRecorded {
        hash: String,
        #[source]
        source: LedgerError,
    },

    /// The hash append failed and the pending marker could not be removed.
    /// Neither log changed yet; the next `issue` or
    /// [`crate::Issuer::recover`] completes this issuance.
    #[error("credential {hash} left pending: {source}")]
    Pending {
        hash: String,
        #[source]
        source: LedgerError,
    },
}

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export.
    #[error("nothing to export")]
    Empty,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during any EduCrypt operation.
#[derive(Debug, Error)]
pub enum EducryptError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Issue(#[from] IssueError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for EduCrypt operations.
pub type Result<T> = std::result::Result<T, EducryptError>;
