//! Common types, card-linking DTOs, and errors shared across `card-vault` crates.

pub mod error;
pub mod protocol;

pub use error::VaultError;
