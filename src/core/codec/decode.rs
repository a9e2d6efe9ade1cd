//! Fast image decoding with format-specific optimizations.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to image crate for other formats.

use crate::error::DecodeError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Source formats with a dedicated decode path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Other,
}

impl SourceFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Self::Jpeg,
            _ => Self::Other,
        }
    }
}

/// Fast image decoder that uses optimized decoders per format
pub struct FastDecoder;

impl FastDecoder {
    /// Decode an image from a file path using the fastest available decoder.
    ///
    /// - JPEG: zune-jpeg, falling back to the image crate on failure
    /// - Other formats: image crate, format sniffed from the file contents
    pub fn decode(path: &Path) -> Result<DynamicImage, DecodeError> {
        let bytes = fs::read(path).map_err(|e| DecodeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        match SourceFormat::from_path(path) {
            SourceFormat::Jpeg => {
                Self::decode_jpeg(path, &bytes).or_else(|_| Self::decode_fallback(path, &bytes))
            }
            SourceFormat::Other => Self::decode_fallback(path, &bytes),
        }
    }

    /// Fast JPEG decoding using zune-jpeg
    fn decode_jpeg(path: &Path, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
        let malformed = |reason: String| DecodeError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(bytes, options);

        let pixels = decoder
            .decode()
            .map_err(|e| malformed(format!("zune-jpeg decode failed: {:?}", e)))?;

        let info = decoder
            .info()
            .ok_or_else(|| malformed("Failed to get image info".to_string()))?;

        let width = info.width as u32;
        let height = info.height as u32;

        let out_colorspace = decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB);

        let image = match out_colorspace {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels)
                        .ok_or_else(|| malformed("Failed to create RGB buffer".to_string()))?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels)
                        .ok_or_else(|| malformed("Failed to create RGBA buffer".to_string()))?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels)
                        .ok_or_else(|| malformed("Failed to create Luma buffer".to_string()))?;
                DynamicImage::ImageLuma8(buffer)
            }
            other => {
                return Err(malformed(format!("Unsupported colorspace {:?}", other)));
            }
        };

        Ok(image)
    }

    /// Fallback to image crate, sniffing the format from magic bytes
    fn decode_fallback(path: &Path, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
        image::load_from_memory(bytes).map_err(|e| DecodeError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn format_detection_jpeg() {
        assert_eq!(SourceFormat::from_path(Path::new("photo.jpg")), SourceFormat::Jpeg);
        assert_eq!(SourceFormat::from_path(Path::new("photo.JPEG")), SourceFormat::Jpeg);
    }

    #[test]
    fn format_detection_other() {
        assert_eq!(SourceFormat::from_path(Path::new("image.png")), SourceFormat::Other);
        assert_eq!(SourceFormat::from_path(Path::new("noext")), SourceFormat::Other);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = FastDecoder::decode(Path::new("/nonexistent/missing.png"));
        assert!(matches!(result, Err(DecodeError::Io { .. })));
    }

    #[test]
    fn garbage_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.png");
        fs::write(&path, b"this is not a valid image file").unwrap();

        let result = FastDecoder::decode(&path);
        assert!(matches!(result, Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn decodes_jpeg_through_fast_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        RgbImage::from_pixel(16, 8, Rgb([200, 10, 10])).save(&path).unwrap();

        let image = FastDecoder::decode(&path).unwrap();
        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 8);
    }

    #[test]
    fn png_with_jpg_extension_still_decodes() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("real.png");
        RgbImage::new(3, 3).save(&png).unwrap();
        let mislabeled = dir.path().join("mislabeled.jpg");
        fs::copy(&png, &mislabeled).unwrap();

        let image = FastDecoder::decode(&mislabeled).unwrap();
        assert_eq!(image.width(), 3);
    }
}
