//! # Core Module
//!
//! The UI-agnostic processing engine.
//!
//! ## Modules
//! - `job` - Work items, outcomes and the output path layout
//! - `codec` - Decoding and encoding image files
//! - `transform` - Resize and grayscale transforms
//! - `pipeline` - Stages, queues and the driver that runs them

pub mod codec;
pub mod job;
pub mod pipeline;
pub mod transform;

// Re-export commonly used types
pub use codec::{FileCodec, ImageCodec};
pub use job::{OutputLayout, Outcome, WorkItem};
pub use pipeline::{ExecutionMode, Pipeline, PipelineBuilder, PipelineResult};
pub use transform::{FastResizer, Grayscale, ImageTransform, ResizeConfig};
