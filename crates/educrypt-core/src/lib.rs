//! # EduCrypt Core
//!
//! Pure primitives for EduCrypt: credential records, canonicalization,
//! hashing and RSA signing.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! credential data and key material.
//!
//! ## Key Types
//!
//! - [`CredentialRecord`] - The unsigned credential payload
//! - [`SignedCredential`] - A record plus its hash and signature
//! - [`ContentHash`] - SHA-256 of a record's canonical form
//! - [`IssuerKey`] / [`IssuerPublicKey`] - RSA key material
//!
//! ## Canonicalization
//!
//! Records are hashed and signed over a fixed-order minified JSON string.
//! See [`canonical`] module.

pub mod canonical;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;

pub use canonical::{canonical_bytes, canonicalize, FIELD_ORDER};
pub use credential::{CredentialRecord, SignedCredential};
pub use crypto::{
    decode_signature, encode_signature, hash_hex, verify_signature, IssuerKey, IssuerPublicKey,
    DEFAULT_KEY_BITS, PUBLIC_EXPONENT,
};
pub use error::{CoreError, Field, FieldIssue, ValidationError};
pub use types::ContentHash;
pub use validation::{is_iso_date_shape, validate_record, verify_credential};
