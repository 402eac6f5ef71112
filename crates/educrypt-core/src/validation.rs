//! Credential validation: field checks before issuance, and integrity
//! checks (hash and signature) on signed credentials.

use crate::canonical::canonicalize;
use crate::credential::{CredentialRecord, SignedCredential};
use crate::crypto::{hash_hex, IssuerPublicKey};
use crate::error::{Field, FieldIssue, ValidationError};

/// Validate a record before it is signed.
///
/// Checks, in order:
/// 1. Every field is non-empty after trimming whitespace
/// 2. A non-empty graduation date has the shape `YYYY-MM-DD`
///
/// All issues are collected and returned together. Values are checked as
/// given; they are not trimmed or otherwise normalized.
pub fn validate_record(record: &CredentialRecord) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    let fields = [
        (Field::Name, &record.name),
        (Field::Degree, &record.degree),
        (Field::GraduationDate, &record.graduation_date),
        (Field::Issuer, &record.issuer),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            issues.push(FieldIssue::Missing(field));
        }
    }

    if !record.graduation_date.is_empty() && !is_iso_date_shape(&record.graduation_date) {
        issues.push(FieldIssue::BadDateFormat);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid(issues))
    }
}

/// Check the `\d{4}-\d{2}-\d{2}` shape. Calendar validity is not checked.
pub fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Verify a signed credential's integrity against the issuer's public key.
///
/// This performs:
/// - Hash recomputation over the canonical record
/// - Signature verification over the same canonical string
pub fn verify_credential(
    credential: &SignedCredential,
    public_key: &IssuerPublicKey,
) -> Result<(), ValidationError> {
    let canonical = canonicalize(&credential.record());

    let actual = hash_hex(&canonical);
    if actual != credential.hash {
        return Err(ValidationError::HashMismatch {
            expected: credential.hash.clone(),
            actual,
        });
    }

    public_key.verify_base64(&canonical, &credential.signature)?;
    Ok(())
}
