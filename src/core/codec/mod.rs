//! # Codec Module
//!
//! Reads images from disk and writes them back.
//!
//! The pipeline only talks to an [`ImageCodec`], so tests (or other
//! front ends) can swap in their own storage. [`FileCodec`] is the
//! filesystem implementation used by the CLI.
//!
//! ## Supported Formats
//! - Decoding: JPEG via `zune-jpeg` (fast path), everything the `image`
//!   crate can sniff from magic bytes (PNG, GIF, BMP, TIFF, WebP, ...)
//! - Encoding: chosen from the destination extension; PNG and JPEG at least

mod decode;
mod encode;

pub use decode::{FastDecoder, SourceFormat};
pub use encode::Encoder;

use crate::error::{DecodeError, EncodeError};
use image::DynamicImage;
use std::path::Path;

/// Decodes source files and encodes processed images.
///
/// Shared between the load and save stages, which run on different
/// threads, hence `Send + Sync`.
pub trait ImageCodec: Send + Sync {
    /// Decode the image at `path`
    fn decode(&self, path: &Path) -> Result<DynamicImage, DecodeError>;

    /// Encode `image` to `path`. Must not create missing directories.
    fn encode(&self, path: &Path, image: &DynamicImage) -> Result<(), EncodeError>;
}

/// Filesystem codec backed by `zune-jpeg` and the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec;

impl FileCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for FileCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage, DecodeError> {
        FastDecoder::decode(path)
    }

    fn encode(&self, path: &Path, image: &DynamicImage) -> Result<(), EncodeError> {
        Encoder::encode(path, image)
    }
}
