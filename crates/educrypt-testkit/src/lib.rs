//! # EduCrypt Testkit
//!
//! Testing utilities for EduCrypt.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known records with their expected canonical form and hash
//! - **Generators**: Proptest strategies for credential records
//! - **Fixtures**: A deterministic test key and sample records
//! - **Fault injection**: [`FaultyStore`], a store wrapper that fails on demand
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the canonical encoding so that every verifier hashes
//! a record the same way:
//!
//! ```rust
//! use educrypt_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, hash) in verify_all_vectors() {
//!     assert!(ok, "{name}: {hash}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use educrypt_testkit::generators::record;
//!
//! proptest! {
//!     #[test]
//!     fn hash_is_deterministic(r in record()) {
//!         prop_assert_eq!(r.content_hash(), r.clone().content_hash());
//!     }
//! }
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use educrypt_store::MemoryStore;
//! use educrypt_testkit::FaultyStore;
//!
//! let store = FaultyStore::new(MemoryStore::new());
//! store.fail_writes_to("educrypt_issued_credentials");
//! ```

pub mod faulty;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use faulty::FaultyStore;
pub use fixtures::{ada_lovelace, sample_record, test_key, test_key_pem, unsigned_credential};
pub use generators::{date, field, record};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
