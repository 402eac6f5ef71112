//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical string and its SHA-256 so that any
//! verifier, in any language, hashes a record identically.

use educrypt_core::{canonicalize, hash_hex, CredentialRecord};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub record_name: &'static str,
    pub degree: &'static str,
    pub graduation_date: &'static str,
    pub issuer: &'static str,
    /// Expected canonical string.
    pub expected_canonical: &'static str,
    /// Expected lowercase hex SHA-256 of the canonical string.
    pub expected_hash: &'static str,
}

impl GoldenVector {
    /// The record this vector describes.
    pub fn record(&self) -> CredentialRecord {
        CredentialRecord::new(
            self.record_name,
            self.degree,
            self.graduation_date,
            self.issuer,
        )
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Ada Lovelace",
            record_name: "Ada Lovelace",
            degree: "BSc Computer Science",
            graduation_date: "2024-06-01",
            issuer: "Analytical University",
            expected_canonical: r#"{"name":"Ada Lovelace","degree":"BSc Computer Science","graduationDate":"2024-06-01","issuer":"Analytical University"}"#,
            expected_hash: "8b75eb3302189c6f4ec52373b789675378c286717be4e101bd0a533065512f35",
        },
        GoldenVector {
            name: "Quotes and non-ASCII",
            record_name: "Zoë \"Zed\" O'Neil",
            degree: "MSc Mathematics",
            graduation_date: "2023-12-15",
            issuer: "Université de Genève",
            expected_canonical: r#"{"name":"Zoë \"Zed\" O'Neil","degree":"MSc Mathematics","graduationDate":"2023-12-15","issuer":"Université de Genève"}"#,
            expected_hash: "dee0a14548f27e3e5f52b91bc35a358b1d304e069b8cf69a3c657356ae2aa293",
        },
        GoldenVector {
            name: "Grace Hopper",
            record_name: "Grace Hopper",
            degree: "PhD Mathematics",
            graduation_date: "1934-06-15",
            issuer: "Yale University",
            expected_canonical: r#"{"name":"Grace Hopper","degree":"PhD Mathematics","graduationDate":"1934-06-15","issuer":"Yale University"}"#,
            expected_hash: "79bfeea0c079e48adabe1b7e0e3de3ba57dec6c12d7ddd75f2d16e596629c1c7",
        },
        GoldenVector {
            name: "Escaped newline",
            record_name: "A",
            degree: "B",
            graduation_date: "2000-01-01",
            issuer: "Line one\nLine two",
            expected_canonical: r#"{"name":"A","degree":"B","graduationDate":"2000-01-01","issuer":"Line one\nLine two"}"#,
            expected_hash: "f23171a10b06a345409fcd42e8c5a4c505ac4561d164942ac2d5cde4d7bb1de3",
        },
    ]
}

/// Check every vector. Returns `(name, matches, actual_hash)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let canonical = canonicalize(&v.record());
            let hash = hash_hex(&canonical);
            let matches = canonical == v.expected_canonical && hash == v.expected_hash;
            (v.name.to_string(), matches, hash)
        })
        .collect()
}
