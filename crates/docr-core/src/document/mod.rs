//! Document classification and field extraction.

mod classifier;
mod parser;
pub mod rules;

pub use classifier::classify;
pub use parser::{DocumentParser, ExtractionResult, RuleBasedParser};

use crate::models::document::{DocumentType, ExtractedFields};

/// Extract fields for an already-classified document type with default
/// settings. `Unknown` yields the empty record; no input raises.
pub fn extract_fields(document_type: DocumentType, text: &str) -> ExtractedFields {
    RuleBasedParser::new().extract_for(document_type, text)
}

/// Classify text and extract fields in one pass with default settings.
pub fn parse_text(text: &str) -> ExtractionResult {
    RuleBasedParser::new().parse(text)
}
