//! Session PIN access.
//!
//! # Lifecycle
//!
//! 1. On PIN setup or login the host calls [`SecretGateway::set_pin`].
//! 2. Encrypt and reveal paths fetch it with [`SecretGateway::get_pin`] when
//!    the caller has no PIN in hand.
//! 3. On logout the host calls [`SecretGateway::clear_pin`].
//!
//! How the PIN is persisted between sessions belongs to the host. This crate
//! only defines the trait and an in-memory implementation.
//!
//! # Security invariants
//!
//! - A [`Pin`] is never logged; its `Debug` output is redacted.
//! - PIN bytes are zeroed when the last copy is dropped.

pub mod store;

pub use store::InMemorySecretGateway;

use std::sync::Arc;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A user PIN held in memory.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Pin(String);

impl Pin {
    pub fn new(pin: impl Into<String>) -> Self {
        Self(pin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Pin {
    fn from(pin: &str) -> Self {
        Self::new(pin)
    }
}

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the PIN, not even its length.
        f.write_str("Pin([REDACTED])")
    }
}

/// Store for the PIN of the current session.
///
/// Implemented by the host application. Implementations must be safe to call
/// from several threads at once.
#[cfg_attr(test, mockall::automock)]
pub trait SecretGateway: Send + Sync {
    /// The session PIN, if one is set.
    fn get_pin(&self) -> Option<Pin>;

    /// Set or replace the session PIN.
    fn set_pin(&self, pin: Pin);

    /// Forget the session PIN.
    fn clear_pin(&self);
}

impl<G: SecretGateway + ?Sized> SecretGateway for Arc<G> {
    fn get_pin(&self) -> Option<Pin> {
        (**self).get_pin()
    }

    fn set_pin(&self, pin: Pin) {
        (**self).set_pin(pin)
    }

    fn clear_pin(&self) {
        (**self).clear_pin()
    }
}
