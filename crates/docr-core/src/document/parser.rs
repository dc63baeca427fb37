//! Rule-based document parsing: classify, then extract for the type.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::document::{DocumentType, ExtractedFields, ScanReport};

use super::classifier::classify;
use super::rules::{AadhaarExtractor, PanExtractor, StatementExtractor};

/// Result of a full classify-and-extract pass over one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Classified document type.
    pub document_type: DocumentType,
    /// Fields extracted for that type.
    pub fields: ExtractedFields,
    /// Raw input text.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Convert into the serializable boundary report, truncating the raw
    /// text snippet at `snippet_len` characters.
    pub fn into_report(self, snippet_len: usize) -> ScanReport {
        ScanReport::new(self.document_type, self.fields, &self.raw_text, snippet_len)
    }
}

/// Trait for document parsing.
pub trait DocumentParser {
    /// Classify the text and extract fields for the resulting type.
    ///
    /// Infallible: malformed or empty text yields an `Unknown` result
    /// with an empty record, never an error.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Parser backed by the per-type rule extractors.
pub struct RuleBasedParser {
    /// Whether extracted dates must be real calendar dates.
    validate_dates: bool,
    /// Upper bound on a collapsed address line, in characters.
    max_address_len: usize,
}

impl RuleBasedParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            validate_dates: true,
            max_address_len: 160,
        }
    }

    /// Build a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            validate_dates: config.validate_dates,
            max_address_len: config.max_address_len,
        }
    }

    /// Set calendar validation of extracted dates.
    pub fn with_date_validation(mut self, validate: bool) -> Self {
        self.validate_dates = validate;
        self
    }

    /// Set the address length bound.
    pub fn with_max_address_len(mut self, max: usize) -> Self {
        self.max_address_len = max;
        self
    }

    /// Extract fields for an already-classified document type.
    ///
    /// `Unknown` always yields the empty record.
    pub fn extract_for(&self, document_type: DocumentType, text: &str) -> ExtractedFields {
        match document_type {
            DocumentType::AadhaarCard => ExtractedFields::Aadhaar(
                AadhaarExtractor::new()
                    .with_date_validation(self.validate_dates)
                    .with_max_address_len(self.max_address_len)
                    .extract(text),
            ),
            DocumentType::PanCard => ExtractedFields::Pan(
                PanExtractor::new()
                    .with_date_validation(self.validate_dates)
                    .extract(text),
            ),
            DocumentType::BankStatement => ExtractedFields::BankStatement(
                StatementExtractor::new()
                    .with_date_validation(self.validate_dates)
                    .extract(text),
            ),
            DocumentType::Unknown => ExtractedFields::empty(),
        }
    }

    fn collect_warnings(document_type: DocumentType, fields: &ExtractedFields) -> Vec<String> {
        let mut warnings = Vec::new();

        match fields {
            ExtractedFields::Aadhaar(f) if f.aadhaar_number.is_none() => {
                warnings.push("Could not extract Aadhaar number".to_string());
            }
            ExtractedFields::Pan(f) if f.pan_number.is_none() => {
                warnings.push("Could not extract PAN number".to_string());
            }
            ExtractedFields::BankStatement(f) if f.account_number.is_none() => {
                warnings.push("Could not extract account number".to_string());
            }
            _ => {}
        }

        if document_type != DocumentType::Unknown && fields.is_empty() {
            warnings.push(format!("No fields extracted for {document_type}"));
        }

        warnings
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for RuleBasedParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing document from {} characters of text", text.len());

        let document_type = classify(text);
        let fields = self.extract_for(document_type, text);
        let warnings = Self::collect_warnings(document_type, &fields);

        debug!(
            "Classified as {} with {} warning(s)",
            document_type,
            warnings.len()
        );

        ExtractionResult {
            document_type,
            fields,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pan_card() {
        let parser = RuleBasedParser::new();
        let result = parser.parse("PERMANENT ACCOUNT NUMBER\nABCDE1234F\n01/01/1990");

        assert_eq!(result.document_type, DocumentType::PanCard);
        let ExtractedFields::Pan(fields) = &result.fields else {
            panic!("expected PAN fields");
        };
        assert_eq!(fields.pan_number.as_deref(), Some("ABCDE1234F"));
        assert_eq!(fields.dob.as_deref(), Some("01/01/1990"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_aadhaar_card() {
        let parser = RuleBasedParser::new();
        let result = parser.parse("UIDAI\n1234 5678 9012\nDOB 02/02/1995\nMALE");

        assert_eq!(result.document_type, DocumentType::AadhaarCard);
        let ExtractedFields::Aadhaar(fields) = &result.fields else {
            panic!("expected Aadhaar fields");
        };
        assert_eq!(
            fields.aadhaar_number_masked.as_deref(),
            Some("XXXX XXXX 9012")
        );
        assert_eq!(fields.gender.as_deref(), Some("MALE"));
        assert_eq!(fields.dob.as_deref(), Some("02/02/1995"));
    }

    #[test]
    fn test_parse_bank_statement() {
        let parser = RuleBasedParser::new();
        let result = parser.parse(
            "BANK STATEMENT\nACCOUNT NUMBER: 000111222333\n01/01/2023 GROCERY STORE 500.00 4500.00",
        );

        assert_eq!(result.document_type, DocumentType::BankStatement);
        let ExtractedFields::BankStatement(fields) = &result.fields else {
            panic!("expected bank statement fields");
        };
        assert_eq!(fields.transactions.len(), 1);
        assert_eq!(fields.transactions[0].date, "01/01/2023");
        assert_eq!(fields.transactions[0].amount, "500.00");
        assert_eq!(fields.transactions[0].balance, "4500.00");
        assert_eq!(fields.account_number_masked.as_deref(), Some("********2333"));
    }

    #[test]
    fn test_parse_empty_text() {
        let result = RuleBasedParser::new().parse("");

        assert_eq!(result.document_type, DocumentType::Unknown);
        assert!(result.fields.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = RuleBasedParser::new();
        let text = "UIDAI\n1234 5678 9012\nDOB 02/02/1995\nMALE";

        let first = parser.parse(text);
        let second = parser.parse(text);

        assert_eq!(first.document_type, second.document_type);
        assert_eq!(first.fields, second.fields);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_unknown_type_extracts_empty() {
        let parser = RuleBasedParser::new();
        // Same text, but extraction keyed on Unknown must stay empty.
        let fields =
            parser.extract_for(DocumentType::Unknown, "UIDAI\n1234 5678 9012\nDOB 02/02/1995");
        assert_eq!(fields, ExtractedFields::empty());
    }

    #[test]
    fn test_missing_identifier_warns() {
        let parser = RuleBasedParser::new();
        let result = parser.parse("INCOME TAX DEPARTMENT");

        assert_eq!(result.document_type, DocumentType::PanCard);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("PAN number")));
    }

    #[test]
    fn test_report_snippet_truncation() {
        let text = format!("BANK STATEMENT\n{}", "X".repeat(2000));
        let result = RuleBasedParser::new().parse(&text);
        let report = result.into_report(1000);
        assert_eq!(report.raw_text_snippet.chars().count(), 1000);
    }
}
