//! Store trait: the abstract interface for key-value persistence.
//!
//! Every piece of persisted EduCrypt state (the private key and both logs)
//! is a single string value under a fixed key. Implementations include
//! SQLite (primary) and in-memory (for tests).

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// The KeyValueStore trait: async interface for string persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **All-or-nothing writes**: `set` either replaces the whole value or
///   fails and leaves the previous value in place.
/// - **Missing is not an error**: `get` on an unknown key returns `None`.
/// - **Removal is idempotent**: removing an unknown key succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`.
    async fn remove(&self, key: &str) -> Result<()>;

    /// List all keys, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        (**self).keys().await
    }
}

/// Extension trait for JSON-valued entries.
pub trait StoreExt: KeyValueStore {
    /// Get and parse a JSON value.
    ///
    /// Unparseable data is reported as [`StoreError::Serialization`].
    fn get_json<T>(&self, key: &str) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Serialize `value` as compact JSON and store it.
    fn set_json<T>(&self, key: &str, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync;
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Serialization {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set(key, &raw).await
    }
}
