//! Display masking for card numbers.

/// Placeholder shown when too few characters are available to reveal any.
pub const FULL_MASK: &str = "**** **** **** ****";

/// Mask a plaintext card number as `**** **** **** 1234`.
///
/// Whitespace and hyphens are ignored. With fewer than four remaining
/// characters nothing is revealed. Never call this on a cipher blob; the last
/// four characters of a blob are not card digits.
pub fn mask(card_number: &str) -> String {
    let clean: Vec<char> = card_number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if clean.len() < 4 {
        return FULL_MASK.to_owned();
    }
    let last_four: String = clean[clean.len() - 4..].iter().collect();
    format!("**** **** **** {last_four}")
}
