//! # Transform Module
//!
//! Pure in-memory image transforms applied between load and save.
//!
//! ## Transforms
//! - [`FastResizer`] - SIMD resize to fixed target dimensions
//! - [`Grayscale`] - collapse color channels to 8-bit luma
//!
//! Both are total: every decoded image produces an output image.

mod resize;

pub use resize::{FastResizer, ResizeConfig};

use image::DynamicImage;

/// A single image-to-image step.
///
/// Takes `&mut self` so implementations can keep scratch buffers between
/// images; each stage owns its own transform, so no sharing is needed.
pub trait ImageTransform: Send {
    /// Short name used in logs and thread names
    fn name(&self) -> &'static str;

    /// Produce the transformed image. Must not fail.
    fn apply(&mut self, image: DynamicImage) -> DynamicImage;
}

/// Luminance-preserving grayscale conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl ImageTransform for Grayscale {
    fn name(&self) -> &'static str {
        "grayscale"
    }

    fn apply(&mut self, image: DynamicImage) -> DynamicImage {
        DynamicImage::ImageLuma8(image.to_luma8())
    }
}
