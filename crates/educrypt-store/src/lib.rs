//! # EduCrypt Store
//!
//! Storage abstraction for EduCrypt. Provides a trait-based interface for
//! key-value persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts persistence behind the [`KeyValueStore`]
//! trait, allowing the issuer to be storage-agnostic. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`KeyValueStore`] - The async trait for all storage operations
//! - [`StoreExt`] - JSON helpers on top of any store
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use educrypt_store::{KeyValueStore, SqliteStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("educrypt.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     store.set("greeting", "hello").await.unwrap();
//!     assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("hello"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value writes**: a value is replaced atomically or not at all
//! - **Missing keys read as `None`**, never as an error
//! - **No cross-key transactions**: callers that update several keys must
//!   handle partial failure themselves

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, StoreExt};
