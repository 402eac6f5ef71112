//! # EduCrypt
//!
//! Issue digitally signed academic credentials and keep a local ledger of
//! everything issued.
//!
//! ## Overview
//!
//! EduCrypt provides an offline library for:
//!
//! - **Keys**: One RSA-2048 key pair per installation, created on first use
//! - **Credentials**: Records hashed and signed over a canonical JSON form
//! - **Ledger**: A credential log plus a deduplicated snapshot of hashes
//! - **Export**: Credentials and snapshots written as JSON files
//!
//! ## Key Concepts
//!
//! - **Canonical form**: Minified JSON of name, degree, graduationDate and
//!   issuer in that order. The hash and the signature are both over it.
//! - **Snapshot**: The ordered set of issued hashes, suitable for anchoring.
//! - **Pending issuance**: A marker that lets [`Issuer::recover`] finish an
//!   issuance interrupted between its two log appends.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use educrypt::{CredentialRecord, Issuer, IssuerConfig};
//! use educrypt::store::SqliteStore;
//!
//! async fn example() {
//!     // Open storage
//!     let store = Arc::new(SqliteStore::open("educrypt.db").unwrap());
//!
//!     // Create the issuer and finish anything a crash interrupted
//!     let issuer = Issuer::new(store, IssuerConfig::default());
//!     issuer.recover().await.unwrap();
//!
//!     // Issue a credential
//!     let credential = issuer
//!         .issue(CredentialRecord::new(
//!             "Ada Lovelace",
//!             "BSc Computer Science",
//!             "2024-06-01",
//!             "Analytical University",
//!         ))
//!         .await
//!         .unwrap();
//!
//!     // Anyone holding the public key can verify it
//!     let public_key = issuer.keys().get_public_key().await.unwrap();
//!     # let _ = (credential, public_key);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `educrypt::core` - Records, canonicalization, hashing, RSA primitives
//! - `educrypt::store` - Storage abstraction, memory and SQLite backends

pub mod config;
pub mod error;
pub mod export;
pub mod issuer;
pub mod keys;
pub mod ledger;

// Re-export component crates
pub use educrypt_core as core;
pub use educrypt_store as store;

// Re-export main types for convenience
pub use config::{slots, IssuerConfig, ReadPolicy};
pub use error::{EducryptError, ExportError, IssueError, KeyError, LedgerError, Result};
pub use export::{credential_json, export_credential, export_snapshot};
pub use issuer::{Issuer, RecoveryOutcome};
pub use keys::KeyManager;
pub use ledger::Ledger;

// Re-export commonly used core types
pub use educrypt_core::{
    canonicalize, hash_hex, verify_signature, CredentialRecord, IssuerKey, IssuerPublicKey,
    SignedCredential, ValidationError,
};
