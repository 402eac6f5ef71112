//! Canonical form for deterministic hashing and signing.
//!
//! A credential record canonicalizes to a minified JSON object with exactly
//! four keys written in a fixed order:
//!
//! ```text
//! {"name":…,"degree":…,"graduationDate":…,"issuer":…}
//! ```
//!
//! The order is spelled out in [`FIELD_ORDER`] and written field by field;
//! it never depends on map or struct iteration order. String values use JSON
//! string escaping (quotes, backslashes and control characters), and all
//! other characters are emitted as raw UTF-8.
//!
//! Both the hash and the signature are computed over this exact string, so
//! any change here invalidates every credential ever issued.

use crate::credential::CredentialRecord;
use crate::error::Field;

/// The canonical key order.
pub const FIELD_ORDER: [Field; 4] = [
    Field::Name,
    Field::Degree,
    Field::GraduationDate,
    Field::Issuer,
];

/// Produce the canonical string for a record. Pure and total.
pub fn canonicalize(record: &CredentialRecord) -> String {
    let mut out = String::with_capacity(
        64 + record.name.len()
            + record.degree.len()
            + record.graduation_date.len()
            + record.issuer.len(),
    );
    out.push('{');
    for (i, field) in FIELD_ORDER.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_json_string(&mut out, field.json_name());
        out.push(':');
        push_json_string(&mut out, field_value(record, *field));
    }
    out.push('}');
    out
}

/// The canonical string as UTF-8 bytes.
pub fn canonical_bytes(record: &CredentialRecord) -> Vec<u8> {
    canonicalize(record).into_bytes()
}

fn field_value(record: &CredentialRecord, field: Field) -> &str {
    match field {
        Field::Name => &record.name,
        Field::Degree => &record.degree,
        Field::GraduationDate => &record.graduation_date,
        Field::Issuer => &record.issuer,
    }
}

fn push_json_string(out: &mut String, value: &str) {
    out.push_str(&serde_json::Value::from(value).to_string());
}
