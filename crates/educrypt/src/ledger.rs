//! The Credential Ledger: two independent append-only logs.
//!
//! - The **credential log** holds every signed credential, in issue order.
//!   Duplicates are allowed.
//! - The **snapshot log** holds the hex hash of every issued credential, in
//!   first-issue order, without duplicates.
//!
//! Each log is one JSON array under its own storage key. Every mutation is
//! read, modify, write inside that log's mutex, so concurrent appends
//! through one `Ledger` never lose each other's entries.
//!
//! Appends always parse the stored log strictly and refuse to overwrite a
//! log they cannot read. Listings follow the configured [`ReadPolicy`].

use std::sync::Arc;

use educrypt_core::SignedCredential;
use educrypt_store::{KeyValueStore, StoreError, StoreExt};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{slots, ReadPolicy};
use crate::error::LedgerError;

/// Local store of issued credentials and their hashes.
pub struct Ledger<S: KeyValueStore> {
    store: Arc<S>,
    read_policy: ReadPolicy,
    credentials: Mutex<()>,
    snapshot: Mutex<()>,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Create a ledger over `store`.
    pub fn new(store: Arc<S>, read_policy: ReadPolicy) -> Self {
        Self {
            store,
            read_policy,
            credentials: Mutex::new(()),
            snapshot: Mutex::new(()),
        }
    }

    /// The read policy used for listings.
    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credential Log
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a signed credential. Returns the new log length.
    pub async fn append_credential(&self, credential: &SignedCredential) -> Result<usize, LedgerError> {
        let _guard = self.credentials.lock().await;

        let mut log: Vec<SignedCredential> = self.load_strict(slots::CREDENTIALS).await?;
        log.push(credential.clone());
        self.store.set_json(slots::CREDENTIALS, &log).await?;

        debug!(hash = %credential.hash, len = log.len(), "credential appended");
        Ok(log.len())
    }

    /// All signed credentials, in issue order.
    pub async fn list_credentials(&self) -> Result<Vec<SignedCredential>, LedgerError> {
        self.load_listing(slots::CREDENTIALS).await
    }

    /// Number of entries in the credential log, read strictly.
    pub async fn credential_count(&self) -> Result<usize, LedgerError> {
        let log: Vec<SignedCredential> = self.load_strict(slots::CREDENTIALS).await?;
        Ok(log.len())
    }

    /// Delete the credential log. Irreversible.
    pub async fn clear_credentials(&self) -> Result<(), LedgerError> {
        let _guard = self.credentials.lock().await;
        self.store.remove(slots::CREDENTIALS).await?;
        info!("credential log cleared");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshot Log
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a hash unless already present. Returns `true` if it was added.
    ///
    /// A hash that is already present causes no write at all.
    pub async fn append_hash(&self, hash: &str) -> Result<bool, LedgerError> {
        let _guard = self.snapshot.lock().await;

        let mut hashes: Vec<String> = self.load_strict(slots::SNAPSHOT).await?;
        if hashes.iter().any(|h| h == hash) {
            debug!(%hash, "hash already in snapshot");
            return Ok(false);
        }

        hashes.push(hash.to_string());
        self.store.set_json(slots::SNAPSHOT, &hashes).await?;

        debug!(%hash, len = hashes.len(), "hash appended to snapshot");
        Ok(true)
    }

    /// All snapshot hashes, in first-issue order.
    pub async fn list_hashes(&self) -> Result<Vec<String>, LedgerError> {
        self.load_listing(slots::SNAPSHOT).await
    }

    /// Delete the snapshot log. Irreversible.
    pub async fn clear_hashes(&self) -> Result<(), LedgerError> {
        let _guard = self.snapshot.lock().await;
        self.store.remove(slots::SNAPSHOT).await?;
        info!("snapshot log cleared");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Missing is empty; unparseable is [`LedgerError::Corrupt`].
    async fn load_strict<T>(&self, slot: &'static str) -> Result<Vec<T>, LedgerError>
    where
        T: DeserializeOwned + Send,
    {
        match self.store.get_json::<Vec<T>>(slot).await {
            Ok(log) => Ok(log.unwrap_or_default()),
            Err(StoreError::Serialization { message, .. }) => {
                Err(LedgerError::Corrupt { slot, message })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load_listing<T>(&self, slot: &'static str) -> Result<Vec<T>, LedgerError>
    where
        T: DeserializeOwned + Send,
    {
        match self.load_strict(slot).await {
            Ok(log) => Ok(log),
            Err(e) if self.read_policy == ReadPolicy::Lenient => {
                warn!(slot, error = %e, "log unreadable, listing as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use educrypt_store::MemoryStore;
    use educrypt_testkit::fixtures::unsigned_credential;
    use educrypt_testkit::FaultyStore;

    fn ledger() -> (Arc<MemoryStore>, Ledger<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Arc::clone(&store), Ledger::new(store, ReadPolicy::Lenient))
    }

    #[tokio::test]
    async fn test_empty_store_lists_empty() {
        let (_, ledger) = ledger();
        assert!(ledger.list_credentials().await.unwrap().is_empty());
        assert!(ledger.list_hashes().await.unwrap().is_empty());
        assert_eq!(ledger.credential_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_credentials_in_order() {
        let (_, ledger) = ledger();
        let creds: Vec<_> = (0..5).map(unsigned_credential).collect();

        for (i, c) in creds.iter().enumerate() {
            assert_eq!(ledger.append_credential(c).await.unwrap(), i + 1);
        }
        assert_eq!(ledger.list_credentials().await.unwrap(), creds);
    }

    #[tokio::test]
    async fn test_duplicate_credentials_kept() {
        let (_, ledger) = ledger();
        let c = unsigned_credential(1);
        ledger.append_credential(&c).await.unwrap();
        ledger.append_credential(&c).await.unwrap();
        assert_eq!(ledger.list_credentials().await.unwrap(), vec![c.clone(), c]);
    }

    #[tokio::test]
    async fn test_append_hash_dedups() {
        let (_, ledger) = ledger();
        assert!(ledger.append_hash("aa").await.unwrap());
        assert!(ledger.append_hash("bb").await.unwrap());
        assert!(!ledger.append_hash("aa").await.unwrap());
        assert_eq!(ledger.list_hashes().await.unwrap(), vec!["aa", "bb"]);
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let (store, ledger) = ledger();
        ledger.append_hash("abc").await.unwrap();
        assert_eq!(
            store.get(slots::SNAPSHOT).await.unwrap().as_deref(),
            Some(r#"["abc"]"#)
        );

        let c = unsigned_credential(0);
        ledger.append_credential(&c).await.unwrap();
        let raw = store.get(slots::CREDENTIALS).await.unwrap().unwrap();
        assert!(raw.starts_with(r#"[{"name":"#));
        assert!(raw.contains(r#""graduationDate":"#));
    }

    #[tokio::test]
    async fn test_clear_returns_to_empty() {
        let (_, ledger) = ledger();
        ledger.append_credential(&unsigned_credential(0)).await.unwrap();
        ledger.append_hash("aa").await.unwrap();

        ledger.clear_credentials().await.unwrap();
        ledger.clear_hashes().await.unwrap();
        assert!(ledger.list_credentials().await.unwrap().is_empty());
        assert!(ledger.list_hashes().await.unwrap().is_empty());

        // Clearing an empty log is fine.
        ledger.clear_hashes().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_log_lenient_lists_empty() {
        let store = Arc::new(MemoryStore::with_entries([
            (slots::CREDENTIALS, "{oops"),
            (slots::SNAPSHOT, "[1,2,3]"),
        ]));
        let ledger = Ledger::new(store, ReadPolicy::Lenient);
        assert!(ledger.list_credentials().await.unwrap().is_empty());
        assert!(ledger.list_hashes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_log_strict_is_error() {
        let store = Arc::new(MemoryStore::with_entries([(slots::SNAPSHOT, "not json")]));
        let ledger = Ledger::new(store, ReadPolicy::Strict);
        assert!(matches!(
            ledger.list_hashes().await,
            Err(LedgerError::Corrupt { slot: slots::SNAPSHOT, .. })
        ));
    }

    #[tokio::test]
    async fn test_append_never_overwrites_corrupt_log() {
        let store = Arc::new(MemoryStore::with_entries([(slots::CREDENTIALS, "{oops")]));
        let ledger = Ledger::new(Arc::clone(&store), ReadPolicy::Lenient);

        let err = ledger.append_credential(&unsigned_credential(0)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt { .. }));
        assert_eq!(store.get(slots::CREDENTIALS).await.unwrap().as_deref(), Some("{oops"));
    }

    #[tokio::test]
    async fn test_write_failure_leaves_log_untouched() {
        let store = Arc::new(FaultyStore::new(MemoryStore::new()));
        let ledger = Ledger::new(Arc::clone(&store), ReadPolicy::Lenient);
        ledger.append_hash("first").await.unwrap();

        store.fail_writes_to(slots::SNAPSHOT);
        assert!(matches!(
            ledger.append_hash("second").await,
            Err(LedgerError::Store(StoreError::Unavailable(_)))
        ));
        assert_eq!(ledger.list_hashes().await.unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_read_failure_policy() {
        let store = Arc::new(FaultyStore::new(MemoryStore::new()));
        store.fail_reads_of(slots::CREDENTIALS);

        let lenient = Ledger::new(Arc::clone(&store), ReadPolicy::Lenient);
        assert!(lenient.list_credentials().await.unwrap().is_empty());

        let strict = Ledger::new(store, ReadPolicy::Strict);
        assert!(matches!(
            strict.list_credentials().await,
            Err(LedgerError::Store(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(MemoryStore::new());
        let ledger = Arc::new(Ledger::new(store, ReadPolicy::Strict));

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move {
                    ledger.append_credential(&unsigned_credential(i)).await.unwrap();
                    ledger.append_hash(&format!("{i:064x}")).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ledger.list_credentials().await.unwrap().len(), 32);
        assert_eq!(ledger.list_hashes().await.unwrap().len(), 32);
    }
}
