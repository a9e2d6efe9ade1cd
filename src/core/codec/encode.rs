//! Image encoding to the destination path.

use crate::error::EncodeError;
use image::{DynamicImage, ImageError, ImageFormat};
use std::path::Path;

/// Writes images with the format implied by the destination extension
pub struct Encoder;

impl Encoder {
    pub fn encode(path: &Path, image: &DynamicImage) -> Result<(), EncodeError> {
        let format = ImageFormat::from_path(path).map_err(|_| EncodeError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        // JPEG has no alpha channel
        let result = if format == ImageFormat::Jpeg && image.color().has_alpha() {
            DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format)
        } else {
            image.save_with_format(path, format)
        };

        result.map_err(|e| match e {
            ImageError::IoError(source) => EncodeError::Io {
                path: path.to_path_buf(),
                source,
            },
            ImageError::Unsupported(_) => EncodeError::UnsupportedFormat {
                path: path.to_path_buf(),
            },
            other => EncodeError::Write {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}
