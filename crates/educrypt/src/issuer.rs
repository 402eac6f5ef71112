//! The Issuer: validation, signing and recording of credentials.
//!
//! Issuing a credential touches two independently stored logs. A crash or
//! write failure between the two appends would leave a hash in the
//! snapshot log with no matching credential. To make that detectable the
//! issuer writes a pending marker before touching either log and removes
//! it once both appends succeed; [`Issuer::recover`] finishes any issuance
//! the marker says was interrupted.

use std::sync::Arc;

use educrypt_core::{
    canonicalize, hash_hex, validate_record, verify_credential, CredentialRecord,
    SignedCredential,
};
use educrypt_store::{KeyValueStore, StoreError, StoreExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{slots, IssuerConfig};
use crate::error::{IssueError, LedgerError};
use crate::keys::KeyManager;
use crate::ledger::Ledger;

/// Write-ahead record of an issuance in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingIssuance {
    credential: SignedCredential,
    /// Credential log length before this issuance's append.
    credentials_before: usize,
}

/// Result of [`Issuer::recover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// No interrupted issuance was found.
    Clean,
    /// An interrupted issuance was completed.
    Completed(SignedCredential),
    /// A pending marker was unreadable or inconsistent and was dropped.
    Discarded,
}

/// Issues credentials for a single institution.
///
/// Provides a unified API for:
/// - Signing credential records
/// - Recording them in the credential and snapshot logs
/// - Verifying credentials against the issuer key
/// - Recovering from interrupted issuance
pub struct Issuer<S: KeyValueStore> {
    store: Arc<S>,
    keys: KeyManager<S>,
    ledger: Ledger<S>,
    /// Serializes issuance and recovery; there is one pending-marker slot.
    issuance: Mutex<()>,
}

impl<S: KeyValueStore> Issuer<S> {
    /// Create a new issuer over `store`.
    pub fn new(store: Arc<S>, config: IssuerConfig) -> Self {
        Self {
            keys: KeyManager::new(Arc::clone(&store), config.key_bits),
            ledger: Ledger::new(Arc::clone(&store), config.read_policy),
            store,
            issuance: Mutex::new(()),
        }
    }

    /// The key manager.
    pub fn keys(&self) -> &KeyManager<S> {
        &self.keys
    }

    /// The credential ledger.
    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    /// Validate, hash and sign a record without recording it.
    pub async fn sign_record(&self, record: CredentialRecord) -> Result<SignedCredential, IssueError> {
        validate_record(&record)?;

        let canonical = canonicalize(&record);
        let hash = hash_hex(&canonical);
        let signature = self.keys.sign(&canonical).await?;

        Ok(SignedCredential::from_parts(record, hash, signature))
    }

    /// Issue a credential: sign it, then append its hash to the snapshot
    /// log and the full credential to the credential log.
    ///
    /// An issuance left pending by an earlier failure is completed first.
    /// Validation and key errors abort before anything is written. If the
    /// credential append fails after the hash was recorded the error is
    /// [`IssueError::PartiallyRecorded`]; if the hash append fails and the
    /// marker cannot be removed the error is [`IssueError::Pending`]. In both
    /// cases the next `issue` or `recover` completes the issuance.
    pub async fn issue(&self, record: CredentialRecord) -> Result<SignedCredential, IssueError> {
        let signed = self.sign_record(record).await?;

        let _guard = self.issuance.lock().await;
        self.complete_pending().await?;

        let pending = PendingIssuance {
            credential: signed.clone(),
            credentials_before: self.ledger.credential_count().await?,
        };
        self.store
            .set_json(slots::PENDING_ISSUANCE, &pending)
            .await
            .map_err(LedgerError::from)?;

        if let Err(e) = self.ledger.append_hash(&signed.hash).await {
            // Neither log changed; only a removed marker makes this a clean failure.
            return Err(match self.store.remove(slots::PENDING_ISSUANCE).await {
                Ok(()) => e.into(),
                Err(remove_err) => {
                    warn!(hash = %signed.hash, error = %remove_err, "pending issuance marker kept");
                    IssueError::Pending {
                        hash: signed.hash.clone(),
                        source: e,
                    }
                }
            });
        }

        self.ledger
            .append_credential(&signed)
            .await
            .map_err(|source| IssueError::PartiallyRecorded {
                hash: signed.hash.clone(),
                source,
            })?;

        self.drop_marker().await;
        info!(hash = %signed.hash, issuer = %signed.issuer, "credential issued");
        Ok(signed)
    }

    /// Check a credential's hash and signature against this issuer's key.
    ///
    /// Never creates a key: with no stored key this is
    /// [`KeyError::NoKey`](crate::error::KeyError::NoKey).
    pub async fn verify(&self, credential: &SignedCredential) -> Result<(), IssueError> {
        let public_key = self.keys.load_public_key().await?;
        verify_credential(credential, &public_key)?;
        Ok(())
    }

    /// Complete an issuance interrupted between its two log appends.
    ///
    /// Call once at startup. `issue` also does this before recording a new
    /// credential. The hash append is idempotent; the credential is appended
    /// only if the credential log has not grown since the marker was written.
    pub async fn recover(&self) -> Result<RecoveryOutcome, IssueError> {
        let _guard = self.issuance.lock().await;
        self.complete_pending().await
    }

    /// Body of [`Issuer::recover`]. Caller holds the issuance lock.
    async fn complete_pending(&self) -> Result<RecoveryOutcome, IssueError> {
        let pending = match self
            .store
            .get_json::<PendingIssuance>(slots::PENDING_ISSUANCE)
            .await
        {
            Ok(None) => return Ok(RecoveryOutcome::Clean),
            Ok(Some(pending)) => pending,
            Err(StoreError::Serialization { message, .. }) => {
                warn!(%message, "unreadable pending issuance marker dropped");
                self.remove_marker().await?;
                return Ok(RecoveryOutcome::Discarded);
            }
            Err(e) => return Err(LedgerError::from(e).into()),
        };

        let credential = pending.credential;
        if hash_hex(&canonicalize(&credential.record())) != credential.hash {
            warn!(hash = %credential.hash, "pending issuance has inconsistent hash, dropped");
            self.remove_marker().await?;
            return Ok(RecoveryOutcome::Discarded);
        }

        self.ledger.append_hash(&credential.hash).await?;
        if self.ledger.credential_count().await? <= pending.credentials_before {
            self.ledger.append_credential(&credential).await?;
        }
        self.remove_marker().await?;

        warn!(hash = %credential.hash, "completed interrupted issuance");
        Ok(RecoveryOutcome::Completed(credential))
    }

    async fn remove_marker(&self) -> Result<(), IssueError> {
        self.store
            .remove(slots::PENDING_ISSUANCE)
            .await
            .map_err(|e| IssueError::Ledger(e.into()))
    }

    /// Best-effort marker removal once the logs are in a consistent state.
    async fn drop_marker(&self) {
        if let Err(e) = self.store.remove(slots::PENDING_ISSUANCE).await {
            warn!(error = %e, "failed to remove pending issuance marker");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyError;
    use educrypt_core::{Field, FieldIssue, ValidationError};
    use educrypt_store::MemoryStore;
    use educrypt_testkit::fixtures::{
        ada_lovelace, sample_record, seeded_memory_store, unsigned_credential, TEST_KEY_BITS,
    };
    use educrypt_testkit::FaultyStore;

    fn config() -> IssuerConfig {
        IssuerConfig::default().with_key_bits(TEST_KEY_BITS)
    }

    #[tokio::test]
    async fn test_issue_records_both_logs() {
        let store = seeded_memory_store();
        let issuer = Issuer::new(Arc::clone(&store), config());

        let signed = issuer.issue(ada_lovelace()).await.unwrap();

        assert_eq!(issuer.ledger().list_hashes().await.unwrap(), vec![signed.hash.clone()]);
        assert_eq!(issuer.ledger().list_credentials().await.unwrap(), vec![signed.clone()]);
        assert!(store.get(slots::PENDING_ISSUANCE).await.unwrap().is_none());
        issuer.verify(&signed).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_record_writes_nothing() {
        let store = seeded_memory_store();
        let issuer = Issuer::new(Arc::clone(&store), config());

        let mut record = ada_lovelace();
        record.name = "   ".into();
        match issuer.issue(record).await {
            Err(IssueError::Invalid(ValidationError::Invalid(issues))) => {
                assert_eq!(issues, vec![FieldIssue::Missing(Field::Name)])
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        assert!(issuer.ledger().list_hashes().await.unwrap().is_empty());
        assert!(issuer.ledger().list_credentials().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_key_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::with_entries([(slots::PRIVATE_KEY, "corrupt")]));
        let issuer = Issuer::new(Arc::clone(&store), config());

        assert!(matches!(
            issuer.issue(sample_record(0)).await,
            Err(IssueError::Key(_))
        ));
        assert_eq!(store.keys().await.unwrap(), vec![slots::PRIVATE_KEY]);
    }

    #[tokio::test]
    async fn test_snapshot_failure_leaves_no_marker() {
        let store = Arc::new(FaultyStore::new(seeded_memory_store()));
        store.fail_writes_to(slots::SNAPSHOT);
        let issuer = Issuer::new(Arc::clone(&store), config());

        assert!(matches!(
            issuer.issue(sample_record(0)).await,
            Err(IssueError::Ledger(LedgerError::Store(_)))
        ));
        assert!(store.get(slots::PENDING_ISSUANCE).await.unwrap().is_none());
        assert!(issuer.ledger().list_credentials().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_issue_is_reported_and_recovered() {
        let store = Arc::new(FaultyStore::new(seeded_memory_store()));
        store.fail_writes_to(slots::CREDENTIALS);
        let issuer = Issuer::new(Arc::clone(&store), config());

        let err = issuer.issue(sample_record(3)).await.unwrap_err();
        let hash = match err {
            IssueError::PartiallyRecorded { hash, .. } => hash,
            other => panic!("expected PartiallyRecorded, got {:?}", other),
        };
        assert_eq!(issuer.ledger().list_hashes().await.unwrap(), vec![hash.clone()]);
        assert!(issuer.ledger().list_credentials().await.unwrap().is_empty());

        // Storage comes back; a fresh issuer (next start) repairs the logs.
        store.heal();
        let restarted = Issuer::new(Arc::clone(&store), config());
        match restarted.recover().await.unwrap() {
            RecoveryOutcome::Completed(credential) => assert_eq!(credential.hash, hash),
            other => panic!("expected Completed, got {:?}", other),
        }
        assert_eq!(restarted.ledger().list_hashes().await.unwrap(), vec![hash.clone()]);
        assert_eq!(restarted.ledger().list_credentials().await.unwrap().len(), 1);
        assert_eq!(restarted.recover().await.unwrap(), RecoveryOutcome::Clean);
    }

    #[tokio::test]
    async fn test_next_issue_completes_partial_issuance() {
        let store = Arc::new(FaultyStore::new(seeded_memory_store()));
        store.fail_writes_to(slots::CREDENTIALS);
        let issuer = Issuer::new(Arc::clone(&store), config());

        assert!(matches!(
            issuer.issue(sample_record(1)).await,
            Err(IssueError::PartiallyRecorded { .. })
        ));

        store.heal();
        let second = issuer.issue(sample_record(2)).await.unwrap();

        let credentials = issuer.ledger().list_credentials().await.unwrap();
        let hashes = issuer.ledger().list_hashes().await.unwrap();
        assert_eq!(credentials.len(), 2);
        assert_eq!(credentials[0].record(), sample_record(1));
        assert_eq!(credentials[1], second);
        assert_eq!(
            hashes,
            credentials.iter().map(|c| c.hash.clone()).collect::<Vec<_>>()
        );
        assert_eq!(issuer.recover().await.unwrap(), RecoveryOutcome::Clean);
    }

    #[tokio::test]
    async fn test_unremovable_marker_is_reported_pending() {
        let store = Arc::new(FaultyStore::new(seeded_memory_store()));
        store.fail_writes_to(slots::SNAPSHOT);
        store.fail_removes_of(slots::PENDING_ISSUANCE);
        let issuer = Issuer::new(Arc::clone(&store), config());

        let hash = match issuer.issue(sample_record(4)).await {
            Err(IssueError::Pending { hash, source: LedgerError::Store(_) }) => hash,
            other => panic!("expected Pending, got {:?}", other),
        };
        assert!(store.get(slots::PENDING_ISSUANCE).await.unwrap().is_some());
        assert!(issuer.ledger().list_hashes().await.unwrap().is_empty());
        assert!(issuer.ledger().list_credentials().await.unwrap().is_empty());

        // The caller was told the issuance is pending, and recovery finishes it.
        store.heal();
        match issuer.recover().await.unwrap() {
            RecoveryOutcome::Completed(credential) => assert_eq!(credential.hash, hash),
            other => panic!("expected Completed, got {:?}", other),
        }
        assert_eq!(issuer.ledger().list_hashes().await.unwrap(), vec![hash]);
        assert_eq!(issuer.ledger().list_credentials().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_without_key_creates_none() {
        let store = Arc::new(MemoryStore::new());
        let issuer = Issuer::new(Arc::clone(&store), config());

        assert!(matches!(
            issuer.verify(&unsigned_credential(0)).await,
            Err(IssueError::Key(KeyError::NoKey))
        ));
        assert!(store.get(slots::PRIVATE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recover_does_not_duplicate_completed_append() {
        let store = seeded_memory_store();
        let issuer = Issuer::new(Arc::clone(&store), config());
        let signed = issuer.issue(sample_record(1)).await.unwrap();

        // Simulate a crash after both appends but before marker removal.
        let marker = PendingIssuance {
            credential: signed.clone(),
            credentials_before: 0,
        };
        store.set_json(slots::PENDING_ISSUANCE, &marker).await.unwrap();

        assert_eq!(
            issuer.recover().await.unwrap(),
            RecoveryOutcome::Completed(signed.clone())
        );
        assert_eq!(issuer.ledger().list_credentials().await.unwrap(), vec![signed]);
    }

    #[tokio::test]
    async fn test_recover_discards_garbage_marker() {
        let store = seeded_memory_store();
        store.set(slots::PENDING_ISSUANCE, "{garbage").await.unwrap();
        let issuer = Issuer::new(Arc::clone(&store), config());

        assert_eq!(issuer.recover().await.unwrap(), RecoveryOutcome::Discarded);
        assert!(store.get(slots::PENDING_ISSUANCE).await.unwrap().is_none());
        assert!(issuer.ledger().list_hashes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recover_discards_inconsistent_marker() {
        let store = seeded_memory_store();
        let issuer = Issuer::new(Arc::clone(&store), config());
        let mut signed = issuer.sign_record(sample_record(2)).await.unwrap();
        signed.hash = "0".repeat(64);
        let marker = PendingIssuance {
            credential: signed,
            credentials_before: 0,
        };
        store.set_json(slots::PENDING_ISSUANCE, &marker).await.unwrap();

        assert_eq!(issuer.recover().await.unwrap(), RecoveryOutcome::Discarded);
        assert!(issuer.ledger().list_hashes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_rejects_tampering() {
        let issuer = Issuer::new(seeded_memory_store(), config());
        let signed = issuer.sign_record(sample_record(5)).await.unwrap();

        let mut tampered = signed.clone();
        tampered.issuer.push('!');
        assert!(matches!(
            issuer.verify(&tampered).await,
            Err(IssueError::Invalid(ValidationError::HashMismatch { .. }))
        ));
    }
}
