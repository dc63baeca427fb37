//! Core library for Indian KYC document scanning.
//!
//! This crate provides:
//! - PDF processing (embedded text and image extraction)
//! - OCR pipeline over scanned page images
//! - Keyword/pattern classification of Aadhaar cards, PAN cards and
//!   bank statements
//! - Rule-based field extraction with masking of sensitive numbers

pub mod error;
pub mod models;
pub mod pdf;
pub mod ocr;
pub mod document;

pub use error::{DocrError, Result};
pub use models::config::DocrConfig;
pub use models::document::{
    AadhaarFields, BankStatementFields, DocumentType, ExtractedFields, PanFields, ScanReport,
    StatementPeriod, Transaction, TransactionKind,
};
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use ocr::{normalize_pages, normalize_text, ImagePreprocessor, OcrResult, TextLine};
#[cfg(feature = "native")]
pub use ocr::DocOcrEngine;
pub use document::{
    classify, extract_fields, parse_text, DocumentParser, ExtractionResult, RuleBasedParser,
};
