//! Request and response types for the card-linking flow.
//!
//! These types cross the boundary between the protection core and whatever
//! persistence or UI layer hosts it, so they are plain serde structs.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Link card
// ---------------------------------------------------------------------------

/// User-entered card data submitted when linking a card.
///
/// `number` may contain spaces or hyphens; it is normalised before validation.
#[derive(Clone, Serialize, Deserialize)]
pub struct LinkCardRequest {
    /// Card number as typed, e.g. `"4000 1234 1234 1234"`.
    pub number: String,
    /// Expiry date in `MM/YY` form.
    pub expiry: String,
    /// Card verification value. Validated, never stored.
    pub cvv: String,
}

impl std::fmt::Debug for LinkCardRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkCardRequest")
            .field("number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful card link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedCard {
    /// Value to persist: a cipher blob when a session PIN was available,
    /// otherwise the grouped plaintext number.
    pub stored_number: String,
    /// Masked form safe to render, e.g. `"**** **** **** 1234"`.
    pub display_number: String,
    /// Expiry date in `MM/YY` form.
    pub expiry: String,
    /// Whether `stored_number` is encrypted.
    pub encrypted: bool,
}
