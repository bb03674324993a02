//! Storage-side orchestration: encrypt on write, reveal and mask on read.
//!
//! [`CardProtector`] ties the crypto primitives to a [`SecretGateway`]. Records
//! written while no session PIN is available are kept as plaintext, matching
//! how such records have always been stored. Reading tolerates both forms.

use common::protocol::{LinkCardRequest, LinkedCard};
use common::VaultError;
use tracing::{debug, info, warn};

use crate::card::{validate_cvv, CardNumber, Expiry};
use crate::crypto::{CardCipher, CardNumberField, CipherError};
use crate::mask::{mask, FULL_MASK};
use crate::secret::SecretGateway;

impl From<CipherError> for VaultError {
    fn from(e: CipherError) -> Self {
        match e {
            CipherError::Kdf(_) => VaultError::Derivation(e.to_string()),
            CipherError::InvalidKeyLength => VaultError::Internal(e.to_string()),
            other => VaultError::Encryption(other.to_string()),
        }
    }
}

/// Protects card numbers for storage using the session PIN.
#[derive(Debug, Clone)]
pub struct CardProtector<G> {
    gateway: G,
    cipher: CardCipher,
}

impl<G: SecretGateway> CardProtector<G> {
    /// Create a protector with the default cipher configuration.
    pub fn new(gateway: G) -> Self {
        Self::with_cipher(gateway, CardCipher::default())
    }

    pub fn with_cipher(gateway: G, cipher: CardCipher) -> Self {
        Self { gateway, cipher }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn cipher(&self) -> &CardCipher {
        &self.cipher
    }

    /// Classify a stored value with this protector's detector.
    pub fn classify(&self, stored: &str) -> CardNumberField {
        CardNumberField::classify(stored, self.cipher.detector())
    }

    /// Produce the value to persist for `number`.
    ///
    /// Encrypts under the session PIN if one is set. Without a PIN the number
    /// is returned unchanged and stored as plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Encryption`] or [`VaultError::Derivation`] if the
    /// crypto layer fails; these indicate a broken environment.
    pub fn protect(&self, number: &str) -> Result<String, VaultError> {
        let Some(pin) = self.gateway.get_pin() else {
            warn!("no session PIN; storing card number unencrypted");
            return Ok(number.to_owned());
        };
        let blob = self.cipher.encrypt(number, pin.as_str())?;
        Ok(blob.encode())
    }

    /// Recover the plaintext for a stored value.
    ///
    /// Plaintext records, records that fail to decrypt, and any record read
    /// while no session PIN is set come back unchanged.
    pub fn reveal(&self, stored: &str) -> String {
        match self.gateway.get_pin() {
            Some(pin) => self.cipher.decrypt(stored, pin.as_str()),
            None => {
                debug!("no session PIN; stored card number returned as-is");
                stored.to_owned()
            }
        }
    }

    /// Masked display form of a stored value.
    ///
    /// If the value is still ciphertext after [`CardProtector::reveal`] the
    /// fully masked placeholder is returned, so no blob characters leak into
    /// the display.
    pub fn masked(&self, stored: &str) -> String {
        let revealed = self.reveal(stored);
        if self.classify(&revealed).is_encrypted() {
            return FULL_MASK.to_owned();
        }
        mask(&revealed)
    }

    /// Validate and protect a newly linked card.
    ///
    /// The number is stored in grouped form (`"4000 1234 1234 1234"`). The
    /// CVV is checked and discarded.
    ///
    /// # Errors
    ///
    /// [`VaultError::InvalidCardNumber`], [`VaultError::InvalidExpiry`] or
    /// [`VaultError::InvalidCvv`] for bad input; crypto errors as for
    /// [`CardProtector::protect`].
    pub fn link_card(&self, req: &LinkCardRequest) -> Result<LinkedCard, VaultError> {
        let number = CardNumber::parse(&req.number)?;
        validate_cvv(&req.cvv)?;
        let expiry = Expiry::parse(&req.expiry)?;

        let grouped = number.grouped();
        let stored_number = self.protect(&grouped)?;
        let encrypted = stored_number != grouped;

        info!(encrypted, "card linked");
        Ok(LinkedCard {
            stored_number,
            display_number: mask(&grouped),
            expiry: expiry.as_str().to_owned(),
            encrypted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{looks_like_ciphertext, FormatDetector, KdfError, KdfScheme};
    use crate::secret::{InMemorySecretGateway, MockSecretGateway, Pin};

    fn request(number: &str, expiry: &str, cvv: &str) -> LinkCardRequest {
        LinkCardRequest {
            number: number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    #[test]
    fn protect_encrypts_with_session_pin() {
        let protector = CardProtector::new(InMemorySecretGateway::with_pin("1234"));
        let stored = protector.protect("4000 1234 1234 1234").unwrap();
        assert!(looks_like_ciphertext(&stored));
        assert_eq!(protector.reveal(&stored), "4000 1234 1234 1234");
    }

    #[test]
    fn protect_without_pin_keeps_plaintext() {
        let protector = CardProtector::new(InMemorySecretGateway::new());
        let stored = protector.protect("4000 1234 1234 1234").unwrap();
        assert_eq!(stored, "4000 1234 1234 1234");
    }

    #[test]
    fn reveal_legacy_plaintext() {
        let protector = CardProtector::new(InMemorySecretGateway::with_pin("1234"));
        assert_eq!(protector.reveal("4111111111111111"), "4111111111111111");
    }

    #[test]
    fn reveal_after_logout_returns_blob() {
        let gateway = InMemorySecretGateway::with_pin("1234");
        let protector = CardProtector::new(gateway.clone());
        let stored = protector.protect("4000123412341234").unwrap();
        gateway.clear_pin();
        assert_eq!(protector.reveal(&stored), stored);
    }

    #[test]
    fn masked_from_blob_and_plaintext() {
        let protector = CardProtector::new(InMemorySecretGateway::with_pin("1234"));
        let stored = protector.protect("4000 1234 1234 9876").unwrap();
        assert_eq!(protector.masked(&stored), "**** **** **** 9876");
        assert_eq!(protector.masked("4111 1111 1111 1111"), "**** **** **** 1111");
    }

    #[test]
    fn masked_never_exposes_ciphertext() {
        let gateway = InMemorySecretGateway::with_pin("1234");
        let protector = CardProtector::new(gateway.clone());
        let stored = protector.protect("4000123412341234").unwrap();
        gateway.set_pin(Pin::new("0000"));
        assert_eq!(protector.masked(&stored), FULL_MASK);
        gateway.clear_pin();
        assert_eq!(protector.masked(&stored), FULL_MASK);
    }

    #[test]
    fn link_card_with_pin() {
        let protector = CardProtector::new(InMemorySecretGateway::with_pin("4321"));
        let linked = protector
            .link_card(&request("4000-1234-1234-5678", "09/28", "123"))
            .unwrap();
        assert!(linked.encrypted);
        assert_eq!(linked.display_number, "**** **** **** 5678");
        assert_eq!(linked.expiry, "09/28");
        assert_eq!(protector.reveal(&linked.stored_number), "4000 1234 1234 5678");
    }

    #[test]
    fn link_card_without_pin() {
        let protector = CardProtector::new(InMemorySecretGateway::new());
        let linked = protector
            .link_card(&request("4000123412345678", "09/28", "1234"))
            .unwrap();
        assert!(!linked.encrypted);
        assert_eq!(linked.stored_number, "4000 1234 1234 5678");
    }

    #[test]
    fn link_card_validation_order() {
        let protector = CardProtector::new(InMemorySecretGateway::with_pin("1234"));
        assert!(matches!(
            protector.link_card(&request("4000", "09/28", "123")),
            Err(VaultError::InvalidCardNumber)
        ));
        assert!(matches!(
            protector.link_card(&request("4000123412345678", "09/28", "1")),
            Err(VaultError::InvalidCvv)
        ));
        assert!(matches!(
            protector.link_card(&request("4000123412345678", "0928", "123")),
            Err(VaultError::InvalidExpiry)
        ));
    }

    #[test]
    fn protect_fetches_pin_from_gateway() {
        let mut gateway = MockSecretGateway::new();
        gateway
            .expect_get_pin()
            .times(2)
            .returning(|| Some(Pin::new("2468")));
        let protector = CardProtector::new(gateway);
        let stored = protector.protect("5500000000000004").unwrap();
        assert_eq!(protector.reveal(&stored), "5500000000000004");
    }

    #[test]
    fn protect_never_sets_or_clears_pin() {
        let mut gateway = MockSecretGateway::new();
        gateway.expect_get_pin().returning(|| None);
        gateway.expect_set_pin().never();
        gateway.expect_clear_pin().never();
        let protector = CardProtector::new(gateway);
        assert_eq!(protector.protect("5500000000000004").unwrap(), "5500000000000004");
    }

    #[test]
    fn custom_cipher_is_used() {
        let cipher = CardCipher::new(
            KdfScheme::salted(vec![4u8; 16]).unwrap(),
            FormatDetector::default(),
        );
        let salted = CardProtector::with_cipher(InMemorySecretGateway::with_pin("1234"), cipher);
        let plain = CardProtector::new(InMemorySecretGateway::with_pin("1234"));
        let stored = salted.protect("4000123412341234").unwrap();
        assert_eq!(salted.reveal(&stored), "4000123412341234");
        assert_eq!(plain.reveal(&stored), stored);
    }

    #[test]
    fn cipher_error_maps_to_vault_error() {
        let e: VaultError = CipherError::AeadFailure.into();
        assert_eq!(e.code(), "encryption_failure");
        let e: VaultError = CipherError::Kdf(KdfError::Mac).into();
        assert_eq!(e.code(), "derivation_failure");
        let e: VaultError = CipherError::InvalidKeyLength.into();
        assert!(matches!(e, VaultError::Internal(_)));
    }

    #[test]
    fn linked_card_json_keeps_blob_intact() {
        let protector = CardProtector::new(InMemorySecretGateway::with_pin("1357"));
        let linked = protector
            .link_card(&request("4000 1234 1234 4321", "11/29", "321"))
            .unwrap();
        let json = serde_json::to_value(&linked).unwrap();
        assert_eq!(json["display_number"], "**** **** **** 4321");
        assert_eq!(json["encrypted"], true);
        assert!(json.get("cvv").is_none());

        let decoded: LinkedCard = serde_json::from_value(json).unwrap();
        assert_eq!(protector.reveal(&decoded.stored_number), "4000 1234 1234 4321");
    }
}
