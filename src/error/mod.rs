//! # Error Module
//!
//! Error types for the image pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths and what went wrong
//! - **Item errors are data** - a bad image never aborts the batch; only
//!   configuration and thread-spawn failures reach the caller as `Err`

use std::path::PathBuf;
use thiserror::Error;

/// Top-level pipeline error
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to start {stage} stage: {source}")]
    Spawn {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while loading a source image
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Errors that occur while writing a processed image
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Unsupported output format for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to write image {path}: {source}. Make sure the output directory exists.")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode image {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;
