//! Document data models for Indian KYC document extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification label assigned to an input document.
///
/// Assigned exactly once per document and never revised. Every input maps to
/// one of these four labels; anything unrecognized is `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Aadhaar identity card (12-digit UIDAI number).
    AadhaarCard,
    /// PAN card (permanent account number, income tax).
    PanCard,
    /// Bank account statement.
    BankStatement,
    /// Unrecognized document.
    #[default]
    Unknown,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentType::AadhaarCard => "AADHAAR_CARD",
            DocumentType::PanCard => "PAN_CARD",
            DocumentType::BankStatement => "BANK_STATEMENT",
            DocumentType::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Fields extracted from an Aadhaar card.
///
/// Every field is optional: a pattern that does not match yields `None`,
/// never an empty string. Both the unmasked and masked number are kept;
/// display policy belongs to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AadhaarFields {
    /// Card holder name (positional heuristic, best effort).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Date of birth in DD/MM/YYYY form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,

    /// Gender (MALE / FEMALE / TRANSGENDER).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// 12-digit Aadhaar number, grouped as on the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<String>,

    /// Masked form, e.g. "XXXX XXXX 9012".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_number_masked: Option<String>,

    /// Address line following the ADDRESS label, collapsed and capped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl AadhaarFields {
    /// Check whether anything was extracted.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dob.is_none()
            && self.gender.is_none()
            && self.aadhaar_number.is_none()
            && self.address.is_none()
    }
}

/// Fields extracted from a PAN card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanFields {
    /// Card holder name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Father's name (appears below the holder name on the card).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,

    /// Date of birth in DD/MM/YYYY form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,

    /// PAN number (5 letters, 4 digits, 1 letter).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
}

impl PanFields {
    /// Check whether anything was extracted.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.father_name.is_none()
            && self.dob.is_none()
            && self.pan_number.is_none()
    }
}

/// Fields extracted from a bank account statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankStatementFields {
    /// Issuing bank name (label or first-line heuristic, best effort).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,

    /// Account number digits as found (may be short if the source was
    /// already partially masked).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    /// Masked account number, all but the last 4 digits hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number_masked: Option<String>,

    /// Date range the statement covers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_period: Option<StatementPeriod>,

    /// Parsed transaction lines in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<Transaction>,
}

impl BankStatementFields {
    /// Check whether anything was extracted.
    pub fn is_empty(&self) -> bool {
        self.bank_name.is_none()
            && self.account_number.is_none()
            && self.statement_period.is_none()
            && self.transactions.is_empty()
    }
}

/// Date range a bank statement covers, both ends DD/MM/YYYY.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub from: String,
    pub to: String,
}

/// A single parsed transaction line.
///
/// Amounts and balances stay verbatim strings; nothing is synthesized or
/// normalized beyond what the line itself carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Posting date in DD/MM/YYYY form.
    pub date: String,

    /// Free-text description between the date and the amounts.
    pub description: String,

    /// Transaction amount as printed (sign and separators kept).
    pub amount: String,

    /// Debit/credit tag when the line carries one.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,

    /// Running balance as printed.
    pub balance: String,
}

/// Direction tag on a transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Debit,
    Credit,
}

impl TransactionKind {
    /// Parse the tag token found between amount and balance.
    pub fn from_token(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DR" | "DEBIT" => Some(TransactionKind::Debit),
            "CR" | "CREDIT" => Some(TransactionKind::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Debit => f.write_str("DEBIT"),
            TransactionKind::Credit => f.write_str("CREDIT"),
        }
    }
}

/// The per-type record produced by extraction.
///
/// Serializes untagged so the JSON is the bare field map the document type
/// implies; the `Empty` variant (unknown documents, by contract) serializes
/// as `{}`. Serialize-only: untagged deserialization over all-optional
/// structs is ambiguous and nothing needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedFields {
    Aadhaar(AadhaarFields),
    Pan(PanFields),
    BankStatement(BankStatementFields),
    Empty {},
}

impl ExtractedFields {
    /// The empty record.
    pub fn empty() -> Self {
        ExtractedFields::Empty {}
    }

    /// True when no field in the record carries a value.
    pub fn is_empty(&self) -> bool {
        match self {
            ExtractedFields::Aadhaar(f) => f.is_empty(),
            ExtractedFields::Pan(f) => f.is_empty(),
            ExtractedFields::BankStatement(f) => f.is_empty(),
            ExtractedFields::Empty {} => true,
        }
    }
}

impl Default for ExtractedFields {
    fn default() -> Self {
        ExtractedFields::Empty {}
    }
}

/// The boundary response for one scanned document.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Classification label.
    pub document_type: DocumentType,

    /// Extracted (and masked) fields for that label.
    pub extracted_fields: ExtractedFields,

    /// Leading slice of the normalized text, for caller-side debugging.
    pub raw_text_snippet: String,
}

impl ScanReport {
    /// Build a report, truncating the snippet at `snippet_len` characters.
    pub fn new(
        document_type: DocumentType,
        extracted_fields: ExtractedFields,
        raw_text: &str,
        snippet_len: usize,
    ) -> Self {
        Self {
            document_type,
            extracted_fields,
            raw_text_snippet: raw_text.chars().take(snippet_len).collect(),
        }
    }
}
