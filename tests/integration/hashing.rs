//! Fingerprints agree with git blob ids

use proptest::prelude::*;
use vaultsync::tree::hasher::{hash_bytes, hash_text};

#[test]
fn test_known_git_blob_ids() {
    let cases: &[(&[u8], &str)] = &[
        (b"", "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"),
        (b"hello\n", "ce013625030ba8dba906f756967f9e9ca394464a"),
        (b"hello world", "95d09f2b10159347eece71399a7e2e907ea3df4f"),
    ];
    for (content, expected) in cases {
        assert_eq!(hash_bytes(content), *expected);
    }
}

#[test]
fn test_multibyte_text_hashes_its_utf8_bytes() {
    let text = "r\u{e9}sum\u{e9} \u{1f4dd}";
    assert_eq!(hash_text(text), hash_bytes(text.as_bytes()));
    assert_ne!(hash_text(text), hash_text("resume "));
}

#[test]
fn test_fingerprint_is_forty_hex_chars() {
    let fp = hash_bytes(&[0u8, 159, 146, 150]);
    assert_eq!(fp.len(), 40);
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

proptest! {
    #[test]
    fn prop_text_and_bytes_agree(s in ".{0,64}") {
        prop_assert_eq!(hash_text(&s), hash_bytes(s.as_bytes()));
    }

    #[test]
    fn prop_distinct_content_distinct_fingerprint(
        a in proptest::collection::vec(any::<u8>(), 0..64),
        b in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(hash_bytes(&a), hash_bytes(&b));
    }
}
