//! `card-vault`: card-number protection for a banking client.
//!
//! Components:
//! - [`crypto::kdf`]: PIN to 256-bit key.
//! - [`crypto::cipher`]: AES-256-GCM blobs, with pass-through on failure.
//! - [`crypto::detect`]: plaintext vs cipher-blob heuristic.
//! - [`mask`]: `**** **** **** 1234` display form.
//! - [`secret`]: session PIN gateway trait and in-memory implementation.
//! - [`protector`]: encrypt-on-write / reveal-on-read orchestration.
//!
//! Start-up for a host application:
//! 1. Load [`VaultConfig`] from the environment.
//! 2. Optionally install the tracing subscriber with [`telemetry::init`].
//! 3. Build a [`CardProtector`] around the host's [`SecretGateway`].

pub mod card;
pub mod config;
pub mod crypto;
pub mod mask;
pub mod pin_hash;
pub mod protector;
pub mod secret;
pub mod telemetry;

pub use card::{format_for_display, CardNumber, Expiry};
pub use config::VaultConfig;
pub use crypto::{
    decrypt, derive_key, encrypt, looks_like_ciphertext, CardCipher, CardNumberField, CipherBlob,
    CipherError, DerivedKey, FormatDetector, KdfScheme,
};
pub use mask::mask;
pub use pin_hash::{hash_pin, verify_pin};
pub use protector::CardProtector;
pub use secret::{InMemorySecretGateway, Pin, SecretGateway};
