//! Rule-based field extractors for Indian identity and banking documents.

pub mod aadhaar;
pub mod pan;
pub mod bank;
pub mod transactions;
pub mod dates;
pub mod amounts;
pub mod mask;
pub mod patterns;

pub use aadhaar::{extract_aadhaar, AadhaarExtractor};
pub use pan::{extract_pan, PanExtractor};
pub use bank::{extract_statement, StatementExtractor};
pub use transactions::parse_transactions;
pub use dates::{is_calendar_date, DateExtractor};
pub use amounts::{format_amount, parse_amount};
pub use mask::{mask_aadhaar, mask_digits};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
