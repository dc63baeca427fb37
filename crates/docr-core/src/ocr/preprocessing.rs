//! Image preprocessing for OCR.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::debug;

/// Image preprocessor for the OCR pipeline.
pub struct ImagePreprocessor {
    /// Maximum image dimension (longer side).
    max_size: u32,
    /// Adaptive threshold window size, in pixels.
    block_size: u32,
    /// Constant subtracted from the local mean.
    threshold_bias: i32,
    /// Gaussian blur sigma for denoising.
    denoise_sigma: f32,
}

impl ImagePreprocessor {
    /// Create a preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            max_size: 2048,
            block_size: 15,
            threshold_bias: 5,
            denoise_sigma: 1.2,
        }
    }

    /// Set maximum image dimension.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    /// Scale the image down so its longer side fits within the limit,
    /// preserving aspect ratio. Smaller images pass through unchanged.
    pub fn resize_to_limit(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (new_width, new_height) = self.capped_dimensions(width, height);

        if (new_width, new_height) == (width, height) {
            return image.clone();
        }

        debug!(
            "Resizing {}x{} image to {}x{}",
            width, height, new_width, new_height
        );

        image.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    }

    /// Scan cleanup pass: grayscale, light denoise, then an adaptive
    /// threshold that keeps text legible under uneven lighting.
    pub fn enhance(&self, image: &DynamicImage) -> DynamicImage {
        let gray = image.to_luma8();
        let denoised = image::imageops::blur(&gray, self.denoise_sigma);
        let binary = self.adaptive_threshold(&denoised);

        DynamicImage::ImageLuma8(binary)
    }

    fn capped_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let longer = width.max(height);

        if longer <= self.max_size {
            return (width, height);
        }

        let scale = self.max_size as f32 / longer as f32;
        let new_width = ((width as f32 * scale) as u32).max(1);
        let new_height = ((height as f32 * scale) as u32).max(1);

        (new_width, new_height)
    }

    /// Binarize against the local mean so shadows and lighting
    /// gradients do not swallow text the way a global threshold would.
    fn adaptive_threshold(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut result = GrayImage::new(width, height);
        let half = self.block_size / 2;

        for y in 0..height {
            let y_start = y.saturating_sub(half);
            let y_end = (y + half + 1).min(height);

            for x in 0..width {
                let x_start = x.saturating_sub(half);
                let x_end = (x + half + 1).min(width);

                let mut sum = 0u32;
                let mut count = 0u32;

                for ly in y_start..y_end {
                    for lx in x_start..x_end {
                        sum += image.get_pixel(lx, ly)[0] as u32;
                        count += 1;
                    }
                }

                let local_mean = (sum / count) as i32;
                let value = image.get_pixel(x, y)[0] as i32;
                let output = if value > local_mean - self.threshold_bias {
                    255
                } else {
                    0
                };

                result.put_pixel(x, y, Luma([output]));
            }
        }

        result
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}
