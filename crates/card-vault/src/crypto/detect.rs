//! Heuristic classification of stored card-number values.
//!
//! Stored values carry no type tag, so legacy plaintext and cipher blobs are
//! told apart by shape: a blob is standard base64, longer than any plausible
//! card-number string, and decodes to more bytes than a nonce. A long base64
//! string that is not a blob will be misclassified as ciphertext; decryption
//! then fails and the value passes through unchanged.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::cipher::NONCE_LEN;

/// Default minimum encoded length. `"4111 1111 1111 1111"` is 19 characters.
pub const DEFAULT_MIN_ENCODED_LEN: usize = 20;

/// Classifies stored strings as cipher blobs or plaintext card numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDetector {
    min_encoded_len: usize,
}

impl FormatDetector {
    /// A detector that only accepts values strictly longer than
    /// `min_encoded_len` characters.
    pub fn new(min_encoded_len: usize) -> Self {
        Self { min_encoded_len }
    }

    pub fn min_encoded_len(&self) -> usize {
        self.min_encoded_len
    }

    /// Returns `true` if `value` is likely a cipher blob.
    pub fn looks_like_ciphertext(&self, value: &str) -> bool {
        if value.len() <= self.min_encoded_len {
            return false;
        }
        match STANDARD.decode(value) {
            Ok(decoded) => decoded.len() > NONCE_LEN,
            Err(_) => false,
        }
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ENCODED_LEN)
    }
}

/// Classify with the default threshold.
pub fn looks_like_ciphertext(value: &str) -> bool {
    FormatDetector::default().looks_like_ciphertext(value)
}

/// A stored card-number value, tagged by its detected representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardNumberField {
    /// Legacy unencrypted number.
    Plain(String),
    /// Cipher blob.
    Encrypted(String),
}

impl CardNumberField {
    /// Tag `value` according to `detector`.
    pub fn classify(value: impl Into<String>, detector: &FormatDetector) -> Self {
        let value = value.into();
        if detector.looks_like_ciphertext(&value) {
            CardNumberField::Encrypted(value)
        } else {
            CardNumberField::Plain(value)
        }
    }

    /// The stored string, whichever representation it is.
    pub fn as_str(&self) -> &str {
        match self {
            CardNumberField::Plain(s) | CardNumberField::Encrypted(s) => s,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, CardNumberField::Encrypted(_))
    }
}
