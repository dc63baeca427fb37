//! OCR pipeline for scanned documents.

#[cfg(feature = "native")]
mod engine;
mod preprocessing;

#[cfg(feature = "native")]
pub use engine::DocOcrEngine;
pub use preprocessing::ImagePreprocessor;

use serde::{Deserialize, Serialize};

/// One recognized line of text with its page position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Leftmost x coordinate of the region.
    pub left: f32,

    /// Topmost y coordinate of the region.
    pub top: f32,
}

/// Result of OCR processing on one page image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Full text, one recognized line per row in reading order.
    pub text: String,

    /// Recognized lines in reading order.
    pub lines: Vec<TextLine>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Source image dimensions (width, height).
    pub image_size: (u32, u32),
}

/// Uppercase a single blob of text for rule matching.
///
/// The extraction rules run on canonical uppercased text; this is the
/// one place case is normalized.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_uppercase()
}

/// Join per-page text into the single uppercased blob the extraction
/// rules operate on. Blank pages are dropped.
pub fn normalize_pages(pages: &[String]) -> String {
    let joined = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    joined.to_uppercase()
}
