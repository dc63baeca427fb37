//! Masking of sensitive numeric fields.
//!
//! Shared rule: strip everything that is not a digit; a result of 4 or
//! fewer digits is returned unchanged (nothing left to hide), otherwise
//! every digit but the trailing 4 is replaced with the mask character.

use super::patterns::AADHAAR_GROUPED;

const MASK_CHAR: char = '*';
const VISIBLE_SUFFIX: usize = 4;

/// Mask a numeric string, keeping the last 4 digits visible.
pub fn mask_digits(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= VISIBLE_SUFFIX {
        return digits;
    }

    let hidden = digits.len() - VISIBLE_SUFFIX;
    let mut masked = String::with_capacity(digits.len());
    masked.extend(std::iter::repeat(MASK_CHAR).take(hidden));
    masked.push_str(&digits[hidden..]);
    masked
}

/// Mask an Aadhaar number.
///
/// A value still grouped as on the card keeps its grouping in the masked
/// form ("XXXX XXXX 9012"); anything else falls back to the generic rule.
pub fn mask_aadhaar(value: &str) -> String {
    match AADHAAR_GROUPED.captures(value) {
        Some(caps) => format!("XXXX XXXX {}", &caps[3]),
        None => mask_digits(value),
    }
}
