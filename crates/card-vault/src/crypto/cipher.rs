//! AES-256-GCM encryption and decryption of card-number strings.
//!
//! Every call to [`CardCipher::encrypt`] draws a fresh 96-bit nonce from the OS
//! CSPRNG. GCM nonce reuse under one key breaks both confidentiality and
//! authentication, and the key here is a pure function of the PIN, so a
//! counter or fixed nonce is never acceptable.

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::debug;

use super::detect::FormatDetector;
use super::kdf::{derive_key_with, DerivedKey, KdfError, KdfScheme};

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the AES-GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Encoded length of the smallest possible blob (empty plaintext).
pub const MIN_BLOB_ENCODED_LEN: usize = (NONCE_LEN + TAG_LEN + 2) / 3 * 4;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key could not be derived from the PIN.
    #[error(transparent)]
    Kdf(#[from] KdfError),

    /// The derived key has the wrong length for AES-256.
    #[error("invalid key length")]
    InvalidKeyLength,

    /// AES-GCM encryption failed, or decryption failed authentication
    /// (wrong PIN or tampered data).
    #[error("aead operation failed")]
    AeadFailure,

    /// The value is not standard base64.
    #[error("invalid cipher blob encoding")]
    InvalidFormat,

    /// The decoded value is too short to hold a nonce and a tag.
    #[error("cipher blob truncated: {0} bytes")]
    Truncated(usize),

    /// Decryption succeeded but the plaintext is not UTF-8.
    #[error("decrypted plaintext is not valid UTF-8")]
    NotUtf8,
}

/// A parsed cipher blob: `nonce ‖ ciphertext ‖ tag`.
///
/// The string form is the standard-alphabet, padded base64 encoding of those
/// bytes concatenated, on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherBlob {
    nonce: [u8; NONCE_LEN],
    /// Ciphertext with the tag appended.
    sealed: Vec<u8>,
}

impl CipherBlob {
    /// Raw nonce bytes.
    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext followed by the 16-byte tag.
    pub fn sealed(&self) -> &[u8] {
        &self.sealed
    }

    /// Encode to the stored base64 form.
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(NONCE_LEN + self.sealed.len());
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.sealed);
        STANDARD.encode(raw)
    }

    /// Parse the stored base64 form.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] if `s` is not standard base64, or
    /// [`CipherError::Truncated`] if it decodes to fewer than
    /// `NONCE_LEN + TAG_LEN` bytes.
    pub fn decode(s: &str) -> Result<Self, CipherError> {
        let raw = STANDARD.decode(s).map_err(|_| CipherError::InvalidFormat)?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Truncated(raw.len()));
        }
        let (nonce_bytes, sealed) = raw.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            sealed: sealed.to_vec(),
        })
    }
}

impl fmt::Display for CipherBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for CipherBlob {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Encrypts and decrypts card numbers under a fixed derivation scheme and
/// format-detection threshold.
///
/// Holds no key material; keys are derived inside each call.
#[derive(Debug, Clone, Default)]
pub struct CardCipher {
    scheme: KdfScheme,
    detector: FormatDetector,
}

impl CardCipher {
    /// Create a cipher with an explicit scheme and detector.
    pub fn new(scheme: KdfScheme, detector: FormatDetector) -> Self {
        Self { scheme, detector }
    }

    /// The detector used by [`CardCipher::decrypt`].
    pub fn detector(&self) -> &FormatDetector {
        &self.detector
    }

    /// The key-derivation scheme in use.
    pub fn scheme(&self) -> &KdfScheme {
        &self.scheme
    }

    /// Encrypt `plaintext` under a key derived from `pin`.
    ///
    /// # Errors
    ///
    /// Any error here is an environment fault (RNG or primitive unavailable),
    /// not a property of the input.
    pub fn encrypt(&self, plaintext: &str, pin: &str) -> Result<CipherBlob, CipherError> {
        let key = derive_key_with(pin, &self.scheme)?;
        let cipher = build_cipher(&key)?;

        use aes_gcm::aead::rand_core::RngCore;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::AeadFailure)?;

        Ok(CipherBlob {
            nonce: nonce_bytes,
            sealed,
        })
    }

    /// Decrypt a stored card-number value, falling back to the input.
    ///
    /// Values the detector does not classify as ciphertext are legacy
    /// plaintext and come back unchanged. Values that look like ciphertext but
    /// fail to open (wrong PIN, tampering, truncation) also come back
    /// unchanged, so a display path is never blocked by a bad record. The
    /// stored value is never modified. Use [`CardCipher::open_blob`] to see the
    /// failure instead.
    pub fn decrypt(&self, value: &str, pin: &str) -> String {
        if !self.detector.looks_like_ciphertext(value) {
            return value.to_owned();
        }
        match self.open_blob(value, pin) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                debug!(error = %e, "card number did not decrypt; returning stored value");
                value.to_owned()
            }
        }
    }

    /// Decrypt a cipher blob, reporting failure as a typed error.
    ///
    /// Unlike [`CardCipher::decrypt`] this does not consult the detector.
    ///
    /// # Errors
    ///
    /// [`CipherError::InvalidFormat`] or [`CipherError::Truncated`] for
    /// malformed input, [`CipherError::AeadFailure`] if authentication fails,
    /// [`CipherError::NotUtf8`] if the plaintext is not a string.
    pub fn open_blob(&self, value: &str, pin: &str) -> Result<String, CipherError> {
        let blob = CipherBlob::decode(value)?;
        let key = derive_key_with(pin, &self.scheme)?;
        let cipher = build_cipher(&key)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&blob.nonce), blob.sealed.as_ref())
            .map_err(|_| CipherError::AeadFailure)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::NotUtf8)
    }
}

/// Encrypt `plaintext` with the default scheme. See [`CardCipher::encrypt`].
pub fn encrypt(plaintext: &str, pin: &str) -> Result<CipherBlob, CipherError> {
    CardCipher::default().encrypt(plaintext, pin)
}

/// Decrypt with the default scheme and detector. See [`CardCipher::decrypt`].
pub fn decrypt(value: &str, pin: &str) -> String {
    CardCipher::default().decrypt(value, pin)
}

/// Strict decrypt with the default scheme. See [`CardCipher::open_blob`].
pub fn open_blob(value: &str, pin: &str) -> Result<String, CipherError> {
    CardCipher::default().open_blob(value, pin)
}

fn build_cipher(key: &DerivedKey) -> Result<Aes256Gcm, CipherError> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::InvalidKeyLength)
}
