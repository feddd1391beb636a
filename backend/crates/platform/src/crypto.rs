//! Cryptographic Utilities

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Random lowercase hex string of `len_bytes * 2` characters
pub fn random_hex(len_bytes: usize) -> String {
    hex::encode(random_bytes(len_bytes))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Compare two secrets of arbitrary length without leaking where they differ
///
/// Both sides are hashed first so the comparison also hides the length of the
/// expected secret.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    constant_time_eq(&sha256(provided.as_bytes()), &sha256(expected.as_bytes()))
}
