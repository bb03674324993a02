//! Normalisation and validation of user-entered card data.

use common::VaultError;

/// Number of digits in a supported card number.
pub const CARD_DIGITS: usize = 16;

/// Remove spaces and hyphens.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// A validated 16-digit card number.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    /// Parse a card number typed by the user.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidCardNumber`] unless exactly 16 ASCII digits
    /// remain after removing spaces and hyphens.
    pub fn parse(input: &str) -> Result<Self, VaultError> {
        let digits = normalize(input);
        if digits.len() != CARD_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VaultError::InvalidCardNumber);
        }
        Ok(Self(digits))
    }

    /// The bare digits.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Four groups of four, e.g. `"4000 1234 1234 1234"`.
    pub fn grouped(&self) -> String {
        let d = &self.0;
        format!("{} {} {} {}", &d[0..4], &d[4..8], &d[8..12], &d[12..16])
    }
}

impl std::fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CardNumber(****{})", &self.0[CARD_DIGITS - 4..])
    }
}

/// Group `value` as `dddd dddd dddd dddd` if it is a card number, otherwise
/// return it unchanged.
pub fn format_for_display(value: &str) -> String {
    match CardNumber::parse(value) {
        Ok(card) => card.grouped(),
        Err(_) => value.to_owned(),
    }
}

/// A card expiry date in `MM/YY` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry(String);

impl Expiry {
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidExpiry`] unless `input` is two digits, a
    /// slash, and two digits.
    pub fn parse(input: &str) -> Result<Self, VaultError> {
        let b = input.as_bytes();
        let well_formed = b.len() == 5
            && b[2] == b'/'
            && [b[0], b[1], b[3], b[4]].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(VaultError::InvalidExpiry);
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a CVV is 3 or 4 ASCII digits.
pub fn validate_cvv(cvv: &str) -> Result<(), VaultError> {
    if !(3..=4).contains(&cvv.len()) || !cvv.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VaultError::InvalidCvv);
    }
    Ok(())
}
