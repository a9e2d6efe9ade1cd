//! # image-pipeline CLI
//!
//! Command-line interface for the image pipeline.
//!
//! ## Usage
//! ```bash
//! image-pipeline                     # concurrent pipeline (default)
//! image-pipeline --concurrent=false  # sequential
//! ```
//!
//! Always exits with status 0; per-image failures are reported on stderr.

mod cli;

fn main() {
    cli::run();
}
