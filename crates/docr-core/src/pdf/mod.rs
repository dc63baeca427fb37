//! PDF handling: content analysis, embedded text, page images.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use image::DynamicImage;

/// What a PDF carries, decided by scanning its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Has an extractable text layer.
    Text,
    /// Scanned pages, images only.
    Image,
    /// Text layer and images side by side.
    Hybrid,
    /// No text and no images.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// The operations the pipeline needs from a PDF backend.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Number of pages in the loaded document.
    fn page_count(&self) -> u32;

    /// Classify the document content as text, image or hybrid.
    fn analyze(&self) -> PdfType;

    /// Embedded text of the whole document.
    fn extract_text(&self) -> Result<String>;

    /// Decoded images embedded on a page (1-indexed).
    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>>;
}
