//! Card-number encryption primitives.
//!
//! This module is free of storage and session concerns. It provides key
//! derivation, AES-256-GCM encryption and the plaintext/ciphertext heuristic.
//!
//! # Cipher blob format
//!
//! ```text
//! base64(nonce[12] ‖ ciphertext ‖ tag[16])
//! ```
//!
//! Standard alphabet, padded, single line. The format has no version prefix:
//! it must stay byte-compatible with records already in storage.

pub mod cipher;
pub mod detect;
pub mod kdf;

pub use cipher::{decrypt, encrypt, open_blob, CardCipher, CipherBlob, CipherError, NONCE_LEN, TAG_LEN};
pub use detect::{looks_like_ciphertext, CardNumberField, FormatDetector};
pub use kdf::{derive_key, derive_key_with, DerivedKey, KdfError, KdfScheme, KEY_LEN};
