//! Common error types shared across crates.

use thiserror::Error;

/// Top-level card-vault error type.
///
/// Each variant carries a short machine-readable code (see [`VaultError::code`])
/// so callers can branch without matching on message text. Messages never
/// contain card numbers, PINs, or key material.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The card number is not 16 digits once spaces and hyphens are removed.
    #[error("invalid card number: expected 16 digits")]
    InvalidCardNumber,

    /// The expiry date is not in `MM/YY` form.
    #[error("invalid expiry date: expected MM/YY")]
    InvalidExpiry,

    /// The CVV is not 3 or 4 digits.
    #[error("invalid CVV: expected 3-4 digits")]
    InvalidCvv,

    /// The key-derivation primitive could not be initialised.
    #[error("key derivation failure: {0}")]
    Derivation(String),

    /// Encryption failed inside the crypto layer.
    #[error("encryption failure: {0}")]
    Encryption(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::InvalidCardNumber => "invalid_card_number",
            VaultError::InvalidExpiry => "invalid_expiry",
            VaultError::InvalidCvv => "invalid_cvv",
            VaultError::Derivation(_) => "derivation_failure",
            VaultError::Encryption(_) => "encryption_failure",
            VaultError::Internal(_) => "internal_error",
        }
    }
}
