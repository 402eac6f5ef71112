//! Test fixtures and helpers.
//!
//! Common setup code for unit and integration tests.

use std::sync::{Arc, OnceLock};

use educrypt_core::{CredentialRecord, IssuerKey, SignedCredential};
use educrypt_store::MemoryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Key size for test keys. Small enough to generate quickly.
pub const TEST_KEY_BITS: usize = 1024;

/// Storage key the issuer keeps its private key under.
const PRIVATE_KEY_SLOT: &str = "educrypt_private_key";

/// A deterministic issuer key, generated once per process.
pub fn test_key() -> &'static IssuerKey {
    static KEY: OnceLock<IssuerKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(0x4544_5543);
        IssuerKey::generate_with_rng(&mut rng, TEST_KEY_BITS).expect("test key generation")
    })
}

/// PKCS#1 PEM of [`test_key`].
pub fn test_key_pem() -> String {
    test_key().to_pkcs1_pem().expect("test key encoding")
}

/// A memory store that already holds [`test_key`], so no key is generated.
pub fn seeded_memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries([(PRIVATE_KEY_SLOT, test_key_pem())]))
}

/// The canonical example record.
pub fn ada_lovelace() -> CredentialRecord {
    CredentialRecord::new(
        "Ada Lovelace",
        "BSc Computer Science",
        "2024-06-01",
        "Analytical University",
    )
}

/// A valid record that differs for every `i`.
pub fn sample_record(i: usize) -> CredentialRecord {
    CredentialRecord::new(
        format!("Graduate {i}"),
        "BSc Testing",
        format!("{:04}-{:02}-{:02}", 2000 + i % 100, i % 12 + 1, i % 28 + 1),
        "Test University",
    )
}

/// A credential for [`sample_record`] with a real hash and a placeholder
/// signature. For ledger tests that never verify.
pub fn unsigned_credential(i: usize) -> SignedCredential {
    let record = sample_record(i);
    let hash = record.content_hash();
    SignedCredential::from_parts(record, hash, format!("unsigned-{i}"))
}
