//! Common regex patterns for Indian KYC document extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // PAN number (5 letters, 4 digits, 1 letter)
    pub static ref PAN_NUMBER: Regex = Regex::new(
        r"\b([A-Z]{5}[0-9]{4}[A-Z])\b"
    ).unwrap();

    // Any-case variant for classification; extraction stays case-sensitive
    // on canonical uppercased text
    pub static ref PAN_SHAPE: Regex = Regex::new(
        r"(?i)\b[A-Z]{5}[0-9]{4}[A-Z]\b"
    ).unwrap();

    // Aadhaar number, grouped as printed on the card (4-4-4)
    pub static ref AADHAAR_GROUPED: Regex = Regex::new(
        r"\b(\d{4})\s(\d{4})\s(\d{4})\b"
    ).unwrap();

    pub static ref AADHAAR_COMPACT: Regex = Regex::new(
        r"\b(\d{12})\b"
    ).unwrap();

    // Date pattern (these documents print DD/MM/YYYY exclusively)
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{2}/\d{2}/\d{4})\b"
    ).unwrap();

    // Word-bounded so FEMALE is never read as a MALE match
    pub static ref GENDER: Regex = Regex::new(
        r"(?i)\b(MALE|FEMALE|TRANSGENDER)\b"
    ).unwrap();

    // Labeled fields ("LABEL: value" on one line)
    pub static ref NAME_LABEL: Regex = Regex::new(
        r"(?im)^\s*NAME\s*[:\-]\s*(.+?)\s*$"
    ).unwrap();

    pub static ref FATHER_NAME_LABEL: Regex = Regex::new(
        r"(?im)^\s*FATHER'?S?\s+NAME\s*[:\-]\s*(.+?)\s*$"
    ).unwrap();

    // Address label may sit mid-line; value runs to the line break
    // Same-line capture only; the extractor handles a bare label line
    // by reading the following non-blank line.
    pub static ref ADDRESS_LABEL: Regex = Regex::new(
        r"(?i)\bADDRESS\b[ \t]*[:\-]?[ \t]*([^\n]*)"
    ).unwrap();

    // Bank statement labels
    pub static ref BANK_NAME_LABEL: Regex = Regex::new(
        r"(?im)^\s*BANK\s+NAME\s*[:\-]\s*(.+?)\s*$"
    ).unwrap();

    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:ACCOUNT|A/C)\s*(?:NUMBER|NO\.?|#)\s*[:\s\-]*([0-9Xx*]{4,20})"
    ).unwrap();

    // Transaction line: date, description, amount, optional DR/CR tag,
    // balance. Anchored so the description cannot swallow the amounts.
    pub static ref TRANSACTION_LINE: Regex = Regex::new(
        r"^(\d{2}/\d{2}/\d{4})\s+([A-Z0-9][A-Z0-9 .,/&'()\-]*?)\s+([-+]?\d+(?:,\d{2,3})*(?:\.\d+)?)\s+(?:(DR|CR|DEBIT|CREDIT)\s+)?([-+]?\d+(?:,\d{2,3})*(?:\.\d+)?)\s*$"
    ).unwrap();

    // Statement vocabulary for classification. Word-bounded so that
    // REINSTATEMENT and ACCREDITED are not read as ledger terms.
    pub static ref STATEMENT_STRUCTURE: Regex = Regex::new(
        r"\b(?:STATEMENT|ACCOUNT\s+NUMBER|A/C\s+NO)\b"
    ).unwrap();

    pub static ref STATEMENT_ACTIVITY: Regex = Regex::new(
        r"\b(?:DEBIT|CREDIT|WITHDRAWAL|DEPOSIT)\b"
    ).unwrap();
}
