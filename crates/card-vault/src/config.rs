//! Configuration loading and validation for card-vault.
//!
//! Values are read from `CARD_VAULT_*` environment variables. Every variable
//! is optional; an unset variable keeps the behaviour of installations that
//! predate configuration.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::crypto::cipher::MIN_BLOB_ENCODED_LEN;
use crate::crypto::detect::DEFAULT_MIN_ENCODED_LEN;
use crate::crypto::{CardCipher, FormatDetector, KdfScheme};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CARD_VAULT";

/// Validated card-vault configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Base64 per-installation salt. When set, keys are derived with
    /// [`KdfScheme::Salted`]; records written without it will not decrypt.
    #[serde(default)]
    pub kdf_salt: Option<String>,

    /// Values this long or shorter are never treated as cipher blobs.
    #[serde(default = "default_min_blob_len")]
    pub min_blob_len: usize,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_min_blob_len() -> usize {
    DEFAULT_MIN_ENCODED_LEN
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_salt: None,
            min_blob_len: default_min_blob_len(),
            log_level: default_log_level(),
        }
    }
}

impl VaultConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build card-vault configuration from environment")?;

        let c: VaultConfig = cfg
            .try_deserialize()
            .context("failed to deserialise card-vault configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The key-derivation scheme selected by `kdf_salt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the salt is not base64 or is too short.
    pub fn kdf_scheme(&self) -> Result<KdfScheme> {
        let Some(encoded) = &self.kdf_salt else {
            return Ok(KdfScheme::PinDigest);
        };
        let salt = STANDARD
            .decode(encoded.trim())
            .context("CARD_VAULT_KDF_SALT must be standard base64")?;
        KdfScheme::salted(salt).context("CARD_VAULT_KDF_SALT is too short")
    }

    /// Build the [`CardCipher`] this configuration describes.
    pub fn card_cipher(&self) -> Result<CardCipher> {
        Ok(CardCipher::new(
            self.kdf_scheme()?,
            FormatDetector::new(self.min_blob_len),
        ))
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.min_blob_len >= MIN_BLOB_ENCODED_LEN {
            anyhow::bail!(
                "CARD_VAULT_MIN_BLOB_LEN must be below {MIN_BLOB_ENCODED_LEN} or valid blobs would be read as plaintext"
            );
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("CARD_VAULT_LOG_LEVEL must not be empty");
        }
        self.kdf_scheme()?;
        Ok(())
    }
}
