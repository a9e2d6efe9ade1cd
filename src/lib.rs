//! # Image Pipeline
//!
//! Resizes and grayscales a batch of images, either through a staged
//! concurrent pipeline (one thread per stage) or sequentially.
//!
//! ## Architecture
//! The library is split into a core engine and presentation layers:
//! - `core` - Codec, transforms, stages and the pipeline driver
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//!
//! ## Example
//! ```rust,ignore
//! use image_pipeline::core::pipeline::{ExecutionMode, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .source("images/image1.png")
//!     .source("images/image2.png")
//!     .build()?;
//!
//! let result = pipeline.run(ExecutionMode::Concurrent)?;
//! println!("{} succeeded in {:?}", result.summary.succeeded, result.duration);
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PipelineError, Result};

/// Initialize tracing for the library.
///
/// Logs go to stderr so they stay apart from the status lines on stdout.
/// `RUST_LOG` overrides the default `warn` level. Calling this twice is
/// harmless; the second subscriber is ignored.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
