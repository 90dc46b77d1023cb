//! Content fingerprints compatible with git blob object ids
//!
//! fingerprint = hex(SHA-1("blob " || byte_len || "\0" || bytes))
//!
//! Matches the ids the remote repository reports for its files, so local and
//! remote fingerprints can be compared without downloading anything.

use crate::types::Fingerprint;
use sha1::{Digest, Sha1};

/// Compute the fingerprint of raw bytes
pub fn hash_bytes(content: &[u8]) -> Fingerprint {
    let mut hasher = Sha1::new();

    // Object header; length is the encoded byte count
    hasher.update(b"blob ");
    hasher.update(content.len().to_string().as_bytes());
    hasher.update([0u8]);

    hasher.update(content);

    hex::encode(hasher.finalize())
}

/// Compute the fingerprint of text, hashed over its UTF-8 bytes
pub fn hash_text(content: &str) -> Fingerprint {
    hash_bytes(content.as_bytes())
}
