//! Tracing setup: structured JSON logs.
//!
//! # Telemetry invariants
//!
//! - **No card data, PIN or key material** may appear in any span attribute or
//!   log field. Decryption failures are logged by error kind only.
//! - Log level is configurable via `CARD_VAULT_LOG_LEVEL` (default: `info`);
//!   `RUST_LOG` takes precedence when set.

pub mod init;

pub use init::init;
