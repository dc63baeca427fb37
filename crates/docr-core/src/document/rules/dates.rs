//! Date extraction for KYC documents.

use chrono::NaiveDate;

use super::FieldExtractor;
use super::patterns::DATE_DMY;

/// Check that a DD/MM/YYYY token denotes a real calendar date.
pub fn is_calendar_date(token: &str) -> bool {
    NaiveDate::parse_from_str(token, "%d/%m/%Y").is_ok()
}

/// DD/MM/YYYY date extractor.
///
/// Values stay as the matched source tokens: the record format for these
/// documents is the printed date string, not a parsed date.
pub struct DateExtractor {
    validate: bool,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self { validate: true }
    }

    /// Toggle calendar validation. Off keeps OCR-damaged tokens such as
    /// impossible day numbers.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<String> {
        DATE_DMY
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .filter(|token| !self.validate || is_calendar_date(token))
            .collect()
    }
}
