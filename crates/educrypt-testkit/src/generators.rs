//! Proptest generators for property-based testing.

use proptest::prelude::*;

use educrypt_core::{CredentialRecord, SignedCredential};

/// A non-blank field value: mostly plain names, sometimes arbitrary Unicode
/// including quotes, backslashes and control characters.
pub fn field() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[A-Za-z][A-Za-z .'-]{0,40}",
        1 => any::<String>().prop_filter("non-blank", |s| !s.trim().is_empty()),
    ]
}

/// A `YYYY-MM-DD` date.
pub fn date() -> impl Strategy<Value = String> {
    (1900u32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
}

/// A record that passes validation.
pub fn record() -> impl Strategy<Value = CredentialRecord> {
    (field(), field(), date(), field())
        .prop_map(|(name, degree, date, issuer)| CredentialRecord::new(name, degree, date, issuer))
}

/// A credential with a correct hash and a placeholder signature.
pub fn unsigned_credential() -> impl Strategy<Value = SignedCredential> {
    record().prop_map(|r| {
        let hash = r.content_hash();
        SignedCredential::from_parts(r, hash, "unsigned".to_string())
    })
}
