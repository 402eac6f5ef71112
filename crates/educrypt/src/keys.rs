//! The Key Manager: owns the issuer's RSA key pair.
//!
//! The key is created lazily on first use and persisted as PKCS#1 PEM under
//! a fixed storage key. Creation is single-flight: the manager holds an
//! async mutex across load, generate and persist, so overlapping callers
//! observe exactly one key.

use std::sync::Arc;

use educrypt_core::{IssuerKey, IssuerPublicKey};
use educrypt_store::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::slots;
use crate::error::KeyError;

/// Owns the issuer key pair and every operation that touches the private key.
pub struct KeyManager<S: KeyValueStore> {
    store: Arc<S>,
    slot: String,
    key_bits: usize,
    /// Loaded key. The lock doubles as the single-flight guard.
    cached: Mutex<Option<Arc<IssuerKey>>>,
}

impl<S: KeyValueStore> KeyManager<S> {
    /// Create a manager using the default private-key slot.
    pub fn new(store: Arc<S>, key_bits: usize) -> Self {
        Self::with_slot(store, slots::PRIVATE_KEY, key_bits)
    }

    /// Create a manager that keeps its key under a custom slot.
    pub fn with_slot(store: Arc<S>, slot: impl Into<String>, key_bits: usize) -> Self {
        Self {
            store,
            slot: slot.into(),
            key_bits,
            cached: Mutex::new(None),
        }
    }

    /// The storage key holding the private key PEM.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Return the persisted key, creating and persisting one if none exists.
    pub async fn get_or_create_key_pair(&self) -> Result<Arc<IssuerKey>, KeyError> {
        let mut cached = self.cached.lock().await;
        if let Some(key) = cached.as_ref() {
            return Ok(Arc::clone(key));
        }

        let key = match self.load().await? {
            Some(key) => key,
            None => self.create().await?,
        };

        let key = Arc::new(key);
        *cached = Some(Arc::clone(&key));
        Ok(key)
    }

    /// The stored public key, without creating a key if none exists.
    pub async fn load_public_key(&self) -> Result<IssuerPublicKey, KeyError> {
        let mut cached = self.cached.lock().await;
        if let Some(key) = cached.as_ref() {
            return Ok(key.public_key());
        }

        let key = Arc::new(self.load().await?.ok_or(KeyError::NoKey)?);
        *cached = Some(Arc::clone(&key));
        Ok(key.public_key())
    }

    /// Read and parse the stored key. Caller holds the cache lock.
    async fn load(&self) -> Result<Option<IssuerKey>, KeyError> {
        let stored = self
            .store
            .get(&self.slot)
            .await
            .map_err(|e| KeyError::KeyLoadFailed(e.to_string()))?;

        let Some(pem) = stored else {
            return Ok(None);
        };
        let key =
            IssuerKey::from_pkcs1_pem(&pem).map_err(|e| KeyError::KeyLoadFailed(e.to_string()))?;
        debug!(slot = %self.slot, fingerprint = %key.public_key().fingerprint(), "issuer key loaded");
        Ok(Some(key))
    }

    /// Generate and persist a new key. Caller holds the single-flight lock.
    async fn create(&self) -> Result<IssuerKey, KeyError> {
        let bits = self.key_bits;
        let key = tokio::task::spawn_blocking(move || IssuerKey::generate(bits))
            .await
            .map_err(|e| KeyError::KeyGenerationFailed(e.to_string()))?
            .map_err(|e| KeyError::KeyGenerationFailed(e.to_string()))?;

        let pem = key
            .to_pkcs1_pem()
            .map_err(|e| KeyError::KeyGenerationFailed(e.to_string()))?;
        self.store
            .set(&self.slot, &pem)
            .await
            .map_err(KeyError::KeyPersistenceFailed)?;

        info!(
            slot = %self.slot,
            bits,
            fingerprint = %key.public_key().fingerprint(),
            "issuer key created"
        );
        Ok(key)
    }

    /// The issuer's public key.
    pub async fn public_key(&self) -> Result<IssuerPublicKey, KeyError> {
        Ok(self.get_or_create_key_pair().await?.public_key())
    }

    /// The issuer's public key as SPKI PEM, ready for QR rendering.
    pub async fn get_public_key(&self) -> Result<String, KeyError> {
        Ok(self.public_key().await?.to_pem()?)
    }

    /// Sign a canonical string: SHA-256, PKCS#1 v1.5, base64.
    pub async fn sign(&self, canonical: &str) -> Result<String, KeyError> {
        let key = self.get_or_create_key_pair().await?;
        Ok(key.sign_base64(canonical)?)
    }

    /// Verify a base64 signature against the issuer's own public key.
    pub async fn verify(&self, canonical: &str, signature_b64: &str) -> Result<(), KeyError> {
        let key = self.get_or_create_key_pair().await?;
        Ok(key.public_key().verify_base64(canonical, signature_b64)?)
    }
}
