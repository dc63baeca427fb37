//! PDF content extraction backed by lopdf, with pdf-extract for the
//! text layer.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// Default floor below which embedded text is treated as absent; scanned
/// PDFs often carry a few stray characters of producer metadata.
const MIN_EMBEDDED_TEXT: usize = 50;

/// PDF content extractor backed by lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    min_text_length: usize,
}

impl PdfExtractor {
    /// Create an extractor with no document loaded.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            min_text_length: MIN_EMBEDDED_TEXT,
        }
    }

    /// Set the embedded-text length below which `analyze` treats the
    /// text layer as absent.
    pub fn with_min_text_length(mut self, len: usize) -> Self {
        self.min_text_length = len;
        self
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("no document loaded".to_string()))
    }

    /// Scan every object in the document for decodable images.
    fn document_images(&self) -> Vec<DynamicImage> {
        let Ok(doc) = self.document() else {
            return Vec::new();
        };

        let images: Vec<DynamicImage> = doc
            .objects
            .values()
            .filter_map(|object| decode_image_object(doc, object))
            .collect();

        debug!("Found {} decodable images in document", images.len());
        images
    }

    /// Walk up the page tree until a Resources dictionary is found.
    /// Resources is inheritable; the walk is bounded to guard against
    /// reference cycles in malformed files.
    fn page_resources(&self, doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
        let mut node_id = page_id;

        for _ in 0..32 {
            let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
                return None;
            };

            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res))) = doc.dereference(resources) {
                    return Some(res.clone());
                }
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => node_id = *parent,
                _ => return None,
            }
        }

        None
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract must see the decrypted bytes
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("saving decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.raw_data = raw_data;
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self) -> PdfType {
        let has_text = self
            .extract_text()
            .map(|text| text.trim().len() >= self.min_text_length)
            .unwrap_or(false);
        let has_images = !self.document_images().is_empty();

        let pdf_type = match (has_text, has_images) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) => PdfType::Empty,
        };

        debug!(
            "PDF analysis: has_text={}, has_images={} -> {:?}",
            has_text, has_images, pdf_type
        );
        pdf_type
    }

    fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let doc = self.document()?;
        let pages = doc.get_pages();
        let page_id = *pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();

        if let Some(resources) = self.page_resources(doc, page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobjects))) = doc.dereference(xobjects) {
                    for (_, entry) in xobjects.iter() {
                        if let Ok((_, object)) = doc.dereference(entry) {
                            if let Some(image) = decode_image_object(doc, object) {
                                images.push(image);
                            }
                        }
                    }
                }
            }
        }

        // Scanner output sometimes hangs the page scan off an object
        // outside the page's resource dictionary.
        if images.is_empty() {
            debug!("No XObject images on page {}, scanning whole document", page);
            images = self.document_images();
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }
}

/// Decode one PDF object when it is an image XObject. Unsupported
/// codecs and sample layouts yield `None` rather than an error.
fn decode_image_object(doc: &Document, object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };

    let dict = &stream.dict;
    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

    trace!("Image XObject: {}x{}", width, height);

    match image_filter(dict) {
        Some(b"DCTDecode") => {
            // JPEG stream; hand the compressed bytes to the decoder
            return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .ok();
        }
        Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
            trace!("Skipping image with unsupported codec");
            return None;
        }
        _ => {}
    }

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|object| object.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        trace!("Skipping image with {} bits per component", bits);
        return None;
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    decode_raw_samples(&data, width, height, color_space(doc, dict))
}

fn image_filter(dict: &Dictionary) -> Option<&[u8]> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(filters) => filters.first()?.as_name().ok(),
        _ => None,
    }
}

fn color_space<'a>(doc: &'a Document, dict: &'a Dictionary) -> &'a [u8] {
    dict.get(b"ColorSpace")
        .ok()
        .and_then(|object| match object {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(parts) => parts.first().and_then(|part| part.as_name().ok()),
            Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB")
}

/// Rebuild an image from uncompressed 8-bit samples.
fn decode_raw_samples(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    match color_space {
        b"DeviceRGB" | b"RGB" | b"CalRGB" => {
            let expected = (width as usize) * (height as usize) * 3;
            if data.len() < expected {
                return None;
            }
            RgbImage::from_raw(width, height, data[..expected].to_vec())
                .map(DynamicImage::ImageRgb8)
        }
        b"DeviceGray" | b"G" | b"CalGray" => {
            let expected = (width as usize) * (height as usize);
            if data.len() < expected {
                return None;
            }
            GrayImage::from_raw(width, height, data[..expected].to_vec())
                .map(DynamicImage::ImageLuma8)
        }
        _ => {
            trace!(
                "Unsupported color space {:?}",
                String::from_utf8_lossy(color_space)
            );
            None
        }
    }
}
