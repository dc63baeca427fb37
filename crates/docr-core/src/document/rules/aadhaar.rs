//! Aadhaar card field extraction.

use crate::models::document::AadhaarFields;

use super::FieldExtractor;
use super::dates::DateExtractor;
use super::mask::mask_aadhaar;
use super::patterns::{AADHAAR_COMPACT, AADHAAR_GROUPED, ADDRESS_LABEL, GENDER};

/// Lines containing any of these never hold the card holder name.
const NAME_STOPWORDS: &[&str] = &[
    "GOVERNMENT",
    "INDIA",
    "AADHAAR",
    "AADHAR",
    "UIDAI",
    "UNIQUE",
    "IDENTIFICATION",
    "AUTHORITY",
    "DOB",
    "BIRTH",
    "YEAR",
    "MALE",
    "FEMALE",
    "TRANSGENDER",
    "ADDRESS",
    "VID",
    "ENROLMENT",
    "ENROLLMENT",
    "DOWNLOAD",
    "ISSUE",
];

const DEFAULT_MAX_ADDRESS_LEN: usize = 160;

/// Aadhaar card extractor.
pub struct AadhaarExtractor {
    validate_dates: bool,
    max_address_len: usize,
}

impl AadhaarExtractor {
    /// Create a new Aadhaar extractor.
    pub fn new() -> Self {
        Self {
            validate_dates: true,
            max_address_len: DEFAULT_MAX_ADDRESS_LEN,
        }
    }

    /// Set whether DD/MM/YYYY tokens must be real calendar dates.
    pub fn with_date_validation(mut self, validate: bool) -> Self {
        self.validate_dates = validate;
        self
    }

    /// Set the cap on the collapsed address value, in characters.
    pub fn with_max_address_len(mut self, max: usize) -> Self {
        self.max_address_len = max;
        self
    }

    /// Extract every Aadhaar field the text yields. Fields that do not
    /// match stay `None`; this never fails.
    pub fn extract(&self, text: &str) -> AadhaarFields {
        let number = extract_number(text);
        let masked = number.as_deref().map(mask_aadhaar);

        AadhaarFields {
            name: extract_name(text),
            dob: DateExtractor::new()
                .with_validation(self.validate_dates)
                .extract(text),
            gender: extract_gender(text),
            aadhaar_number: number,
            aadhaar_number_masked: masked,
            address: self.extract_address(text),
        }
    }

    fn extract_address(&self, text: &str) -> Option<String> {
        let caps = ADDRESS_LABEL.captures(text)?;
        let group = caps.get(1)?;

        let mut value = group.as_str().trim().to_string();
        if value.is_empty() {
            // Label line carried no value; the address starts on the
            // next non-blank line.
            value = text[group.end()..]
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())?
                .to_string();
        }

        let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
        Some(collapsed.chars().take(self.max_address_len).collect())
    }
}

impl Default for AadhaarExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract Aadhaar fields with default settings.
pub fn extract_aadhaar(text: &str) -> AadhaarFields {
    AadhaarExtractor::new().extract(text)
}

fn extract_number(text: &str) -> Option<String> {
    if let Some(caps) = AADHAAR_GROUPED.captures(text) {
        return Some(format!("{} {} {}", &caps[1], &caps[2], &caps[3]));
    }
    AADHAAR_COMPACT.captures(text).map(|caps| caps[1].to_string())
}

fn extract_gender(text: &str) -> Option<String> {
    GENDER.captures(text).map(|caps| caps[1].to_uppercase())
}

fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| looks_like_name(line))
        .map(str::to_string)
}

/// Name-line heuristic: no boilerplate terms, not digit-heavy (the number
/// line carries 12 digits), not trivially short, and actually alphabetic.
fn looks_like_name(line: &str) -> bool {
    if line.len() < 3 {
        return false;
    }
    let upper = line.to_uppercase();
    if NAME_STOPWORDS.iter().any(|term| upper.contains(term)) {
        return false;
    }
    let digit_count = line.chars().filter(|c| c.is_ascii_digit()).count();
    if digit_count >= 4 {
        return false;
    }
    line.chars().any(|c| c.is_alphabetic())
}
