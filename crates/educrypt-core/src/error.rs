//! Error types for EduCrypt Core.

use std::fmt;

use thiserror::Error;

/// Core errors that can occur during key and signature operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("key encoding failed: {0}")]
    KeyEncoding(String),

    #[error("key decoding failed: {0}")]
    KeyDecoding(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed signature encoding: {0}")]
    SignatureEncoding(String),

    #[error("malformed content hash: {0}")]
    InvalidHash(String),
}

/// The credential field a validation issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Degree,
    GraduationDate,
    Issuer,
}

impl Field {
    /// The field's name in the canonical JSON form.
    pub const fn json_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Degree => "degree",
            Field::GraduationDate => "graduationDate",
            Field::Issuer => "issuer",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// A single problem found while validating a credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    /// The field is empty or whitespace only.
    Missing(Field),
    /// The graduation date is not `YYYY-MM-DD`.
    BadDateFormat,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Missing(field) => write!(f, "{field} is required"),
            FieldIssue::BadDateFormat => f.write_str("graduationDate must be in YYYY-MM-DD format"),
        }
    }
}

/// Validation errors for credential records and signed credentials.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid credential record: {}", join_issues(.0))]
    Invalid(Vec<FieldIssue>),

    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("signature verification failed")]
    SignatureFailed,

    #[error("malformed credential: {0}")]
    Malformed(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature => ValidationError::SignatureFailed,
            CoreError::SignatureEncoding(msg) | CoreError::InvalidHash(msg) => {
                ValidationError::Malformed(msg)
            }
            other => ValidationError::Malformed(other.to_string()),
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
