//! Keyword and pattern rules mapping OCR text to a document type.

use tracing::debug;

use crate::models::document::DocumentType;

use super::rules::patterns::{PAN_SHAPE, STATEMENT_ACTIVITY, STATEMENT_STRUCTURE};

/// Boilerplate phrases printed on PAN cards.
const PAN_PHRASES: [&str; 3] = ["INCOME TAX", "PERMANENT ACCOUNT NUMBER", "PAN CARD"];

/// Aadhaar vocabulary, including the truncated spellings OCR produces.
const AADHAAR_KEYWORDS: [&str; 5] = [
    "AADHAAR",
    "AADHAR",
    "ADHAR",
    "UIDAI",
    "UNIQUE IDENTIFICATION",
];

/// Phrases specific enough to identify a bank statement on their own.
const STATEMENT_PHRASES: [&str; 3] = ["STATEMENT PERIOD", "BANK STATEMENT", "ACCOUNT SUMMARY"];

/// Classify uppercased OCR text into a document type.
///
/// Total over every input, including the empty string: text matching no
/// rule maps to [`DocumentType::Unknown`] rather than an error.
///
/// Rules run in priority order because the vocabularies overlap. The PAN
/// number shape is more specific than any keyword and is checked first,
/// so Aadhaar letters quoting income-tax boilerplate cannot shadow a PAN
/// card that carries its own number.
pub fn classify(text: &str) -> DocumentType {
    let doc_type = if PAN_SHAPE.is_match(text) || contains_any(text, &PAN_PHRASES) {
        DocumentType::PanCard
    } else if contains_any(text, &AADHAAR_KEYWORDS) {
        DocumentType::AadhaarCard
    } else if is_statement(text) {
        DocumentType::BankStatement
    } else {
        DocumentType::Unknown
    };

    debug!("Classified {} chars of text as {}", text.len(), doc_type);
    doc_type
}

/// Strong statement phrases count on their own. Bare ledger words also
/// appear on card offers and receipts, so `DEBIT`/`CREDIT` and friends
/// only count alongside structural vocabulary such as `ACCOUNT NUMBER`.
fn is_statement(text: &str) -> bool {
    contains_any(text, &STATEMENT_PHRASES)
        || (STATEMENT_STRUCTURE.is_match(text) && STATEMENT_ACTIVITY.is_match(text))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
