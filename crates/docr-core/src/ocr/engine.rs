//! OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX
//! runtime).

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{ModelConfig, OcrConfig};

use super::preprocessing::ImagePreprocessor;
use super::{OcrResult, TextLine};

/// Document OCR engine.
pub struct DocOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    preprocessor: ImagePreprocessor,
    config: OcrConfig,
}

impl DocOcrEngine {
    /// Load the model files named by the model configuration.
    pub fn from_model_config(models: &ModelConfig, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = models.detection_path();
        let rec_path = models.recognition_path();
        let dict_path = models.dictionary_path();

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded OCR models from {}", models.model_dir.display());

        Ok(Self {
            engine,
            preprocessor: ImagePreprocessor::new().with_max_size(config.max_image_size),
            config,
        })
    }

    /// Run OCR on one page image.
    ///
    /// Recognized lines below the confidence floor are dropped and the
    /// rest are sorted into reading order before the page text is
    /// assembled.
    pub fn process(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "image has zero dimension ({}x{})",
                width, height
            )));
        }

        debug!("Running OCR on {}x{} image", width, height);

        let prepared = self.prepare(image);

        let regions = self
            .engine
            .run_from_image(&prepared)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut lines: Vec<TextLine> = regions
            .iter()
            .filter(|r| r.confidence >= self.config.min_confidence)
            .map(|r| {
                let (left, top) = polygon_origin(&r.bounding_box);
                TextLine {
                    // the recognizer emits a marker token for glyphs
                    // missing from its dictionary
                    text: r.text.replace("[UNK]", " "),
                    confidence: r.confidence,
                    left,
                    top,
                }
            })
            .collect();

        sort_reading_order(&mut lines);

        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "OCR produced {} lines in {}ms",
            lines.len(),
            processing_time_ms
        );

        Ok(OcrResult {
            text,
            lines,
            processing_time_ms,
            image_size: (width, height),
        })
    }

    /// Convenience: recognized text only.
    pub fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        Ok(self.process(image)?.text)
    }

    fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let resized = self.preprocessor.resize_to_limit(image);
        if self.config.enhance {
            self.preprocessor.enhance(&resized)
        } else {
            resized
        }
    }
}

/// Sort lines top-to-bottom, left-to-right, grouping rows by
/// approximate vertical position.
fn sort_reading_order(lines: &mut [TextLine]) {
    lines.sort_by(|a, b| {
        let row_a = (a.top / 20.0) as i32;
        let row_b = (b.top / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.left
                .partial_cmp(&b.left)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

fn polygon_origin(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    let mut left = f32::INFINITY;
    let mut top = f32::INFINITY;

    for coord in polygon.exterior().coords() {
        left = left.min(coord.x as f32);
        top = top.min(coord.y as f32);
    }

    if left.is_finite() && top.is_finite() {
        (left, top)
    } else {
        (0.0, 0.0)
    }
}
