//! Error types for the docr-core library.
//!
//! Classification and field extraction are soft by contract: a field that
//! cannot be matched becomes `None`, never an error. The variants here cover
//! the hard collaborator failures only (unreadable files, broken PDFs, OCR
//! engine trouble).

use thiserror::Error;

/// Aggregate error for callers driving the whole pipeline through one
/// `Result` type.
#[derive(Error, Debug)]
pub enum DocrError {
    /// A PDF could not be read or mined for content.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The OCR engine failed to load or run.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// An input image could not be decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while digging content out of a PDF.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The bytes do not parse as a PDF.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// A text layer exists but could not be decoded.
    #[error("text extraction failed: {0}")]
    TextExtraction(String),

    /// Decryption with the empty owner password did not work.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document has no pages at all.
    #[error("PDF has no pages")]
    NoPages,

    /// Page number outside the document (pages are 1-indexed).
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Failures in the OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Model files missing or unreadable.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The detection or recognition pass itself failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The input cannot be OCRed (zero-sized or malformed image).
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the docr library.
pub type Result<T> = std::result::Result<T, DocrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        assert_eq!(PdfError::Encrypted.to_string(), "PDF is encrypted");
        assert_eq!(
            PdfError::InvalidPage(9).to_string(),
            "invalid page number: 9"
        );
        assert_eq!(
            OcrError::ModelLoad("det.onnx not found".into()).to_string(),
            "failed to load model: det.onnx not found"
        );
    }

    #[test]
    fn test_aggregate_wraps_collaborator_errors() {
        let err: DocrError = PdfError::NoPages.into();
        assert_eq!(err.to_string(), "PDF error: PDF has no pages");

        let err: DocrError = OcrError::InvalidImage("0x0".into()).into();
        assert_eq!(err.to_string(), "OCR error: invalid image: 0x0");

        let err: DocrError = std::io::Error::other("disk gone").into();
        assert_eq!(err.to_string(), "I/O error: disk gone");

        let decode = image::load_from_memory(b"not an image").unwrap_err();
        let err: DocrError = decode.into();
        assert!(err.to_string().starts_with("image error:"));
    }
}
