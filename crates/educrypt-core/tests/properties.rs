//! Property tests for canonicalization, hashing and signing.

use educrypt_core::{canonicalize, hash_hex, verify_credential, CredentialRecord};
use educrypt_testkit::generators::record;
use educrypt_testkit::test_key;
use proptest::prelude::*;

proptest! {
    #[test]
    fn hash_is_lowercase_hex_and_deterministic(r in record()) {
        let h1 = hash_hex(&canonicalize(&r));
        let h2 = hash_hex(&canonicalize(&r.clone()));
        prop_assert_eq!(h1.len(), 64);
        prop_assert!(h1.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        prop_assert_eq!(h1, h2);
    }

    #[test]
    fn changing_any_field_changes_hash(r in record(), which in 0usize..4, suffix in "[a-z0-9]{1,4}") {
        let mut changed = r.clone();
        match which {
            0 => changed.name.push_str(&suffix),
            1 => changed.degree.push_str(&suffix),
            2 => changed.graduation_date.push_str(&suffix),
            _ => changed.issuer.push_str(&suffix),
        }
        prop_assert_ne!(hash_hex(&canonicalize(&r)), hash_hex(&canonicalize(&changed)));
    }

    #[test]
    fn canonical_form_parses_back(r in record()) {
        let parsed: CredentialRecord = serde_json::from_str(&canonicalize(&r)).unwrap();
        prop_assert_eq!(parsed, r);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn signatures_verify_for_any_record(r in record()) {
        let signed = r.sign(test_key()).unwrap();
        prop_assert!(verify_credential(&signed, &test_key().public_key()).is_ok());
    }
}
