//! Issuer configuration and the fixed storage keys.

use educrypt_core::DEFAULT_KEY_BITS;

/// Storage keys for every persisted value.
///
/// These names are part of the on-device data format; renaming one orphans
/// existing data.
pub mod slots {
    /// PKCS#1 PEM of the issuer's private key.
    pub const PRIVATE_KEY: &str = "educrypt_private_key";
    /// JSON array of signed credentials.
    pub const CREDENTIALS: &str = "educrypt_issued_credentials";
    /// JSON array of hex hashes.
    pub const SNAPSHOT: &str = "educrypt_snapshot_hashes";
    /// Write-ahead marker for an issuance in progress.
    pub const PENDING_ISSUANCE: &str = "educrypt_pending_issuance";
}

/// How log listings treat data that cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Unreadable or corrupt logs list as empty. Compatible with data
    /// written by earlier releases.
    #[default]
    Lenient,
    /// Unreadable or corrupt logs surface as errors.
    Strict,
}

/// Configuration for the Issuer.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// RSA modulus size for a newly generated key.
    pub key_bits: usize,
    /// Read policy for `list_credentials` / `list_hashes`.
    pub read_policy: ReadPolicy,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            read_policy: ReadPolicy::Lenient,
        }
    }
}

impl IssuerConfig {
    /// Set the key size used when no key exists yet.
    pub fn with_key_bits(mut self, bits: usize) -> Self {
        self.key_bits = bits;
        self
    }

    /// Set the read policy for listings.
    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.read_policy = policy;
        self
    }
}
