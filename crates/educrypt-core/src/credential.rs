//! Credentials: the unsigned record and its signed, immutable form.

use serde::{Deserialize, Serialize};

use crate::canonical::canonicalize;
use crate::crypto::{hash_hex, IssuerKey};
use crate::error::CoreError;

/// The unsigned credential payload.
///
/// There is no identifier field: a credential is identified by the hash of
/// its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// The graduate's full name.
    pub name: String,
    /// The degree awarded.
    pub degree: String,
    /// Graduation date, `YYYY-MM-DD`.
    pub graduation_date: String,
    /// The issuing institution.
    pub issuer: String,
}

impl CredentialRecord {
    /// Create a new record.
    pub fn new(
        name: impl Into<String>,
        degree: impl Into<String>,
        graduation_date: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            degree: degree.into(),
            graduation_date: graduation_date.into(),
            issuer: issuer.into(),
        }
    }

    /// The canonical string that is hashed and signed.
    pub fn canonical(&self) -> String {
        canonicalize(self)
    }

    /// SHA-256 hex of the canonical string.
    pub fn content_hash(&self) -> String {
        hash_hex(&self.canonical())
    }

    /// Hash and sign this record with `key`.
    pub fn sign(self, key: &IssuerKey) -> Result<SignedCredential, CoreError> {
        let canonical = self.canonical();
        let hash = hash_hex(&canonical);
        let signature = key.sign_base64(&canonical)?;
        Ok(SignedCredential::from_parts(self, hash, signature))
    }
}

/// A credential record plus its content hash and issuer signature.
///
/// Field order here is the JSON field order of the credential log and of
/// exported files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedCredential {
    pub name: String,
    pub degree: String,
    pub graduation_date: String,
    pub issuer: String,
    /// Lowercase hex SHA-256 of the canonical record.
    pub hash: String,
    /// Base64 RSA PKCS#1 v1.5 / SHA-256 signature over the canonical record.
    pub signature: String,
}

impl SignedCredential {
    /// Assemble from a record and precomputed hash and signature.
    pub fn from_parts(record: CredentialRecord, hash: String, signature: String) -> Self {
        Self {
            name: record.name,
            degree: record.degree,
            graduation_date: record.graduation_date,
            issuer: record.issuer,
            hash,
            signature,
        }
    }

    /// The record fields only, without hash and signature.
    pub fn record(&self) -> CredentialRecord {
        CredentialRecord {
            name: self.name.clone(),
            degree: self.degree.clone(),
            graduation_date: self.graduation_date.clone(),
            issuer: self.issuer.clone(),
        }
    }
}
