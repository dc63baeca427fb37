//! PAN card field extraction.
//!
//! Names come from two alternative heuristics: a "label: value" strategy
//! and a positional strategy (the lines after the department marker).
//! Either may be absent on a given card; label wins when both hit.

use crate::models::document::PanFields;

use super::FieldExtractor;
use super::dates::DateExtractor;
use super::patterns::{FATHER_NAME_LABEL, NAME_LABEL, PAN_NUMBER};

/// Marker line printed above the holder name on the card.
const DEPARTMENT_MARKER: &str = "INCOME TAX DEPARTMENT";

/// Boilerplate that may sit between the marker and the names.
const MARKER_BOILERPLATE: &[&str] = &["GOVT", "GOVERNMENT", "INDIA", "PERMANENT ACCOUNT", "CARD"];

/// PAN card extractor.
pub struct PanExtractor {
    validate_dates: bool,
}

impl PanExtractor {
    /// Create a new PAN extractor.
    pub fn new() -> Self {
        Self {
            validate_dates: true,
        }
    }

    /// Set whether DD/MM/YYYY tokens must be real calendar dates.
    pub fn with_date_validation(mut self, validate: bool) -> Self {
        self.validate_dates = validate;
        self
    }

    /// Extract every PAN field the text yields. Never fails; unmatched
    /// fields stay `None`.
    pub fn extract(&self, text: &str) -> PanFields {
        let (labelled_name, labelled_father) = labelled_names(text);
        let (positional_name, positional_father) = positional_names(text);

        PanFields {
            name: labelled_name.or(positional_name),
            father_name: labelled_father.or(positional_father),
            dob: DateExtractor::new()
                .with_validation(self.validate_dates)
                .extract(text),
            pan_number: extract_pan_number(text),
        }
    }
}

impl Default for PanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract PAN fields with default settings.
pub fn extract_pan(text: &str) -> PanFields {
    PanExtractor::new().extract(text)
}

fn extract_pan_number(text: &str) -> Option<String> {
    PAN_NUMBER.captures(text).map(|caps| caps[1].to_string())
}

/// Label strategy: NAME / FATHER'S NAME lines.
fn labelled_names(text: &str) -> (Option<String>, Option<String>) {
    let name = NAME_LABEL.captures(text).map(|caps| caps[1].to_string());
    let father = FATHER_NAME_LABEL.captures(text).map(|caps| caps[1].to_string());
    (name, father)
}

/// Positional strategy: the first two name-ish lines after the marker,
/// skipping government boilerplate.
fn positional_names(text: &str) -> (Option<String>, Option<String>) {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let marker = match lines.iter().position(|line| line.contains(DEPARTMENT_MARKER)) {
        Some(idx) => idx,
        None => return (None, None),
    };

    let mut names = lines[marker + 1..]
        .iter()
        .filter(|line| looks_like_name(line))
        .take(2)
        .map(|line| line.to_string());

    (names.next(), names.next())
}

fn looks_like_name(line: &str) -> bool {
    let upper = line.to_uppercase();
    if MARKER_BOILERPLATE.iter().any(|term| upper.contains(term)) {
        return false;
    }
    // label lines belong to the label strategy
    if line.contains(':') {
        return false;
    }
    if line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    line.chars().any(|c| c.is_alphabetic())
}
