//! One-way PIN hashing for local PIN checks.
//!
//! Unrelated to encryption: the hash is what the session layer keeps to verify
//! a PIN, and is never used as key material.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Lowercase hex SHA-256 of the PIN bytes.
pub fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}

/// Check `pin` against a hash produced by [`hash_pin`].
///
/// Comparison is constant-time. A malformed `stored_hash` never verifies.
pub fn verify_pin(pin: &str, stored_hash: &str) -> bool {
    let Ok(expected) = hex::decode(stored_hash.trim()) else {
        return false;
    };
    let actual = Sha256::digest(pin.as_bytes());
    actual.as_slice().ct_eq(expected.as_slice()).into()
}
