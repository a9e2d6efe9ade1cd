//! # Job Module
//!
//! The data that flows through the pipeline.
//!
//! A [`WorkItem`] only exists once its source has decoded, and it moves by
//! value from stage to stage, so no two stages can ever see the same image.
//! The save step turns each item into exactly one [`Outcome`].

mod layout;

pub use layout::OutputLayout;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One image in flight
#[derive(Debug, Clone)]
pub struct WorkItem {
    source: PathBuf,
    destination: PathBuf,
    image: DynamicImage,
}

impl WorkItem {
    /// Create an item for a freshly decoded source image
    pub fn new(source: PathBuf, destination: PathBuf, image: DynamicImage) -> Self {
        Self {
            source,
            destination,
            image,
        }
    }

    /// Where the image was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Where the processed image will be written
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Current payload
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Take the payload out for transformation
    pub fn take_image(self) -> (DynamicImage, WorkItemSlot) {
        (
            self.image,
            WorkItemSlot {
                source: self.source,
                destination: self.destination,
            },
        )
    }

    /// Split into `(source, destination, image)`
    pub fn into_parts(self) -> (PathBuf, PathBuf, DynamicImage) {
        (self.source, self.destination, self.image)
    }
}

/// A [`WorkItem`] whose payload is out being transformed.
///
/// Identities stay fixed; only [`WorkItemSlot::fill`] can produce an item again.
#[derive(Debug)]
pub struct WorkItemSlot {
    source: PathBuf,
    destination: PathBuf,
}

impl WorkItemSlot {
    /// Put the transformed payload back, replacing the old one
    pub fn fill(self, image: DynamicImage) -> WorkItem {
        WorkItem {
            source: self.source,
            destination: self.destination,
            image,
        }
    }
}

/// Terminal record for one item that reached the save step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// Source the item was loaded from
    pub source: PathBuf,
    /// Destination the item was written (or failed to be written) to
    pub destination: PathBuf,
    /// Why the write failed, if it did
    pub failure: Option<String>,
}

impl Outcome {
    pub fn success(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            failure: None,
        }
    }

    pub fn failure(source: PathBuf, destination: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            source,
            destination,
            failure: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}
