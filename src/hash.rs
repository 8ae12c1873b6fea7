//! BLAKE3 fingerprints for dependency manifests

use blake3::Hasher;

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate the BLAKE3 fingerprint of a byte slice
///
/// Line endings are normalized to `\n` first, so a manifest checked out
/// with CRLF endings fingerprints the same as its LF original.
pub fn hash_bytes(content: &[u8]) -> String {
    let mut hasher = Hasher::new();
    let mut start = 0;

    for (i, window) in content.windows(2).enumerate() {
        if window == b"\r\n" {
            hasher.update(&content[start..i]);
            start = i + 1;
        }
    }
    hasher.update(&content[start..]);

    format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex())
}

/// Verify a hash matches the expected value
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    // Normalize both hashes (ensure prefix)
    let normalize = |h: &str| {
        if h.starts_with(HASH_PREFIX) {
            h.to_string()
        } else {
            format!("{}{}", HASH_PREFIX, h)
        }
    };

    normalize(expected) == normalize(actual)
}
