//! Configuration structures for the document pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level settings, one section per pipeline stage. Every section has
/// workable defaults, so an empty `{}` config file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocrConfig {
    /// OCR settings.
    pub ocr: OcrConfig,

    /// PDF handling settings.
    pub pdf: PdfConfig,

    /// Field extraction settings.
    pub extraction: ExtractionConfig,

    /// Ingestion boundary settings.
    pub ingest: IngestConfig,

    /// Model file settings.
    pub models: ModelConfig,
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Run image enhancement (grayscale, denoise, threshold) before OCR.
    pub enhance: bool,

    /// Images with a longer side above this are scaled down first.
    pub max_image_size: u32,

    /// Drop recognized lines below this confidence (0.0 - 1.0).
    pub min_confidence: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enhance: true,
            max_image_size: 2048,
            min_confidence: 0.3,
        }
    }
}

/// PDF handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Target resolution when OCR needs page images.
    pub render_dpi: u32,

    /// Maximum pages to process (identity documents and statements rarely
    /// need more than the leading pages).
    pub max_pages: usize,

    /// Take the embedded text layer when one is present instead of OCR.
    pub prefer_embedded_text: bool,

    /// An embedded text layer shorter than this does not count as real
    /// content.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            render_dpi: 300,
            max_pages: 3,
            prefer_embedded_text: true,
            min_text_length: 50,
        }
    }
}

/// Field extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject DD/MM/YYYY tokens that are not real calendar dates.
    pub validate_dates: bool,

    /// Cap on the collapsed address value, in characters.
    pub max_address_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_dates: true,
            max_address_len: 160,
        }
    }
}

/// Ingestion boundary settings.
///
/// These knobs belong to the boundary, not the extraction core; the core
/// never sees a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Accepted file extensions (lowercase, no dot). `txt` accepts a
    /// pre-normalized text dump straight into the parser.
    pub allowed_extensions: Vec<String>,

    /// Maximum input file size in megabytes.
    pub max_file_mb: u64,

    /// Characters of normalized text echoed back in the scan report.
    pub snippet_len: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![
                "pdf".to_string(),
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "txt".to_string(),
            ],
            max_file_mb: 10,
            snippet_len: 1000,
        }
    }
}

impl IngestConfig {
    /// Check an extension against the allow-list, case-insensitively.
    pub fn allows(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions.iter().any(|e| e == &extension)
    }

    /// The size cap in bytes.
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_mb * 1024 * 1024
    }
}

/// Where the OCR model files live and what they are called.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory holding the model files.
    pub model_dir: PathBuf,

    /// Detection model file name.
    pub detection_model: String,

    /// Recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Full path to the detection model file.
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    /// Full path to the recognition model file.
    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    /// Full path to the character dictionary.
    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }
}

impl DocrConfig {
    /// Read settings from a JSON file. Sections missing from the file
    /// keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(std::io::Error::other)
    }

    /// Write the settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocrConfig::default();
        assert_eq!(config.pdf.max_pages, 3);
        assert_eq!(config.pdf.render_dpi, 300);
        assert_eq!(config.ingest.max_file_mb, 10);
        assert_eq!(config.ingest.snippet_len, 1000);
        assert!(config.extraction.validate_dates);
    }

    #[test]
    fn test_extension_allow_list() {
        let ingest = IngestConfig::default();
        assert!(ingest.allows("pdf"));
        assert!(ingest.allows("JPG"));
        assert!(ingest.allows("jpeg"));
        assert!(!ingest.allows("gif"));
        assert!(!ingest.allows("exe"));
    }

    #[test]
    fn test_model_paths() {
        let models = ModelConfig {
            model_dir: PathBuf::from("/opt/docr/models"),
            ..ModelConfig::default()
        };
        assert_eq!(
            models.detection_path(),
            PathBuf::from("/opt/docr/models/det.onnx")
        );
        assert_eq!(
            models.dictionary_path(),
            PathBuf::from("/opt/docr/models/latin_dict.txt")
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocrConfig::default();
        config.pdf.max_pages = 5;
        config.ingest.max_file_mb = 20;
        config.save(&path).unwrap();

        let loaded = DocrConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.max_pages, 5);
        assert_eq!(loaded.ingest.max_file_mb, 20);
        assert_eq!(loaded.ocr.max_image_size, 2048);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"pdf": {"max_pages": 1}}"#).unwrap();

        let loaded = DocrConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.max_pages, 1);
        assert_eq!(loaded.pdf.render_dpi, 300);
        assert!(loaded.ingest.allows("png"));
    }
}
