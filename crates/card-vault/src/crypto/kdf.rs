//! PIN to 256-bit key derivation.
//!
//! The default scheme is a bare SHA-256 of the PIN bytes. It is deterministic
//! across installations, which is what lets records written before any salt
//! existed stay decryptable. Its key space is only as large as the PIN space.
//!
//! [`KdfScheme::Salted`] mixes a per-installation salt in with HMAC-SHA256.
//! Blobs written under one scheme do not open under the other; switching an
//! existing installation needs a re-encryption pass.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Shortest salt accepted by [`KdfScheme::salted`].
pub const MIN_SALT_LEN: usize = 16;

type HmacSha256 = Hmac<Sha256>;

/// Errors produced by the key-derivation layer.
#[derive(Debug, Error)]
pub enum KdfError {
    /// The salt is shorter than [`MIN_SALT_LEN`] bytes.
    #[error("salt too short: expected at least {MIN_SALT_LEN} bytes, got {0}")]
    SaltTooShort(usize),

    /// The HMAC primitive rejected its key.
    #[error("hmac initialisation failed")]
    Mac,
}

/// A 256-bit key derived from a PIN.
///
/// Built per encrypt/decrypt call and dropped at the end of it. The bytes are
/// zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// How a PIN is turned into a [`DerivedKey`].
#[derive(Clone, Default, PartialEq, Eq)]
pub enum KdfScheme {
    /// `SHA-256(pin)`. Compatible with every record written without a salt.
    #[default]
    PinDigest,
    /// `HMAC-SHA256(key = salt, msg = pin)`.
    Salted(Vec<u8>),
}

impl KdfScheme {
    /// Build a salted scheme, rejecting salts shorter than [`MIN_SALT_LEN`].
    pub fn salted(salt: impl Into<Vec<u8>>) -> Result<Self, KdfError> {
        let salt = salt.into();
        if salt.len() < MIN_SALT_LEN {
            return Err(KdfError::SaltTooShort(salt.len()));
        }
        Ok(KdfScheme::Salted(salt))
    }
}

impl std::fmt::Debug for KdfScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KdfScheme::PinDigest => f.write_str("PinDigest"),
            KdfScheme::Salted(salt) => write!(f, "Salted({} bytes)", salt.len()),
        }
    }
}

/// Derive a key from `pin` with the default [`KdfScheme::PinDigest`] scheme.
///
/// The same PIN always yields the same key. Never fails.
pub fn derive_key(pin: &str) -> DerivedKey {
    DerivedKey(Sha256::digest(pin.as_bytes()).into())
}

/// Derive a key from `pin` under an explicit scheme.
///
/// # Errors
///
/// Returns [`KdfError::Mac`] if the HMAC primitive cannot be keyed. HMAC
/// accepts keys of any length, so this indicates a broken build rather than
/// bad input.
pub fn derive_key_with(pin: &str, scheme: &KdfScheme) -> Result<DerivedKey, KdfError> {
    match scheme {
        KdfScheme::PinDigest => Ok(derive_key(pin)),
        KdfScheme::Salted(salt) => {
            let mut mac = HmacSha256::new_from_slice(salt).map_err(|_| KdfError::Mac)?;
            mac.update(pin.as_bytes());
            Ok(DerivedKey(mac.finalize().into_bytes().into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_pin_same_key() {
        assert_eq!(derive_key("1234").as_bytes(), derive_key("1234").as_bytes());
    }

    #[test]
    fn different_pins_different_keys() {
        assert_ne!(derive_key("1234").as_bytes(), derive_key("0000").as_bytes());
    }

    #[test]
    fn pin_digest_is_sha256_of_pin() {
        let expected: [u8; KEY_LEN] = Sha256::digest(b"4321").into();
        assert_eq!(derive_key("4321").as_bytes(), &expected);
    }

    #[test]
    fn explicit_pin_digest_matches_default() {
        let key = derive_key_with("123456", &KdfScheme::PinDigest).unwrap();
        assert_eq!(key.as_bytes(), derive_key("123456").as_bytes());
    }

    #[test]
    fn salted_differs_from_pin_digest() {
        let scheme = KdfScheme::salted(vec![7u8; MIN_SALT_LEN]).unwrap();
        let salted = derive_key_with("1234", &scheme).unwrap();
        assert_ne!(salted.as_bytes(), derive_key("1234").as_bytes());
    }

    #[test]
    fn salted_depends_on_salt() {
        let a = KdfScheme::salted(vec![1u8; 32]).unwrap();
        let b = KdfScheme::salted(vec![2u8; 32]).unwrap();
        let ka = derive_key_with("1234", &a).unwrap();
        let kb = derive_key_with("1234", &b).unwrap();
        assert_ne!(ka.as_bytes(), kb.as_bytes());
    }

    #[test]
    fn short_salt_rejected() {
        assert!(matches!(
            KdfScheme::salted(vec![0u8; 8]),
            Err(KdfError::SaltTooShort(8))
        ));
    }

    #[test]
    fn key_redacted_in_debug() {
        let dbg = format!("{:?}", derive_key("1234"));
        assert!(dbg.contains("REDACTED"));
    }

    #[test]
    fn salt_bytes_not_in_debug() {
        let scheme = KdfScheme::salted(vec![0xAB; 16]).unwrap();
        assert_eq!(format!("{scheme:?}"), "Salted(16 bytes)");
    }
}
