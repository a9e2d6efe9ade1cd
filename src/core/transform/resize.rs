//! Fast SIMD-accelerated image resizing.
//!
//! Uses fast_image_resize crate which is 5-14x faster than image crate's resize.
//! Automatically uses AVX2/NEON SIMD when available.

use super::ImageTransform;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{imageops, DynamicImage, ImageBuffer, Rgba};

/// Target dimensions for the resize step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
        }
    }
}

/// Fast image resizer using SIMD acceleration.
///
/// Resizes to the exact configured dimensions (aspect ratio is not kept)
/// with a Lanczos3 convolution.
pub struct FastResizer {
    resizer: Resizer,
    config: ResizeConfig,
}

impl FastResizer {
    pub fn new(config: ResizeConfig) -> Self {
        Self {
            resizer: Resizer::new(),
            config,
        }
    }

    /// Resize through fast_image_resize, returning why it refused if it did
    fn resize_simd(&mut self, image: &DynamicImage) -> Result<DynamicImage, String> {
        let ResizeConfig { width, height } = self.config;
        let rgba = image.to_rgba8();

        let src_width = rgba.width();
        let src_height = rgba.height();

        if src_width == 0 || src_height == 0 {
            return Err("Invalid source dimensions".to_string());
        }

        if width == 0 || height == 0 {
            return Err("Invalid destination dimensions".to_string());
        }

        let src_image = Image::from_vec_u8(src_width, src_height, rgba.into_raw(), PixelType::U8x4)
            .map_err(|e| format!("Failed to create source image: {}", e))?;

        let mut dst_image = Image::new(width, height, PixelType::U8x4);

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| format!("Resize failed: {}", e))?;

        let result_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(width, height, dst_image.into_vec())
                .ok_or_else(|| "Failed to create result buffer".to_string())?;

        Ok(DynamicImage::ImageRgba8(result_buffer))
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new(ResizeConfig::default())
    }
}

impl ImageTransform for FastResizer {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn apply(&mut self, image: DynamicImage) -> DynamicImage {
        match self.resize_simd(&image) {
            Ok(resized) => resized,
            Err(reason) => {
                tracing::warn!(%reason, "SIMD resize rejected image, using fallback resampler");
                let ResizeConfig { width, height } = self.config;
                image.resize_exact(width, height, imageops::FilterType::Lanczos3)
            }
        }
    }
}
