//! A store wrapper that fails selected reads and writes on demand.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use educrypt_store::{KeyValueStore, Result, StoreError};

/// Wraps a store and injects [`StoreError::Unavailable`] for chosen keys.
///
/// A failing write leaves the inner store untouched, like a backend that
/// rejected the write.
pub struct FaultyStore<S> {
    inner: S,
    failing_reads: Mutex<HashSet<String>>,
    failing_writes: Mutex<HashSet<String>>,
    failing_removes: Mutex<HashSet<String>>,
}

impl<S: KeyValueStore> FaultyStore<S> {
    /// Wrap `inner`, initially with no faults.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing_reads: Mutex::new(HashSet::new()),
            failing_writes: Mutex::new(HashSet::new()),
            failing_removes: Mutex::new(HashSet::new()),
        }
    }

    /// Make every `set` and `remove` of `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_writes.lock().unwrap().insert(key.to_string());
    }

    /// Make every `remove` of `key` fail, leaving `set` working.
    pub fn fail_removes_of(&self, key: &str) {
        self.failing_removes.lock().unwrap().insert(key.to_string());
    }

    /// Make every `get` of `key` fail.
    pub fn fail_reads_of(&self, key: &str) {
        self.failing_reads.lock().unwrap().insert(key.to_string());
    }

    /// Clear all injected faults.
    pub fn heal(&self) {
        self.failing_reads.lock().unwrap().clear();
        self.failing_writes.lock().unwrap().clear();
        self.failing_removes.lock().unwrap().clear();
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(set: &Mutex<HashSet<String>>, key: &str, op: &str) -> Result<()> {
        if set.lock().unwrap().contains(key) {
            return Err(StoreError::Unavailable(format!("injected {op} fault on {key}")));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for FaultyStore<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Self::check(&self.failing_reads, key, "read")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::check(&self.failing_writes, key, "write")?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Self::check(&self.failing_writes, key, "write")?;
        Self::check(&self.failing_removes, key, "remove")?;
        self.inner.remove(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }
}
