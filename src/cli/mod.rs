//! # CLI Module
//!
//! Command-line interface for the image pipeline.
//!
//! ## Usage
//! ```bash
//! # Concurrent pipeline (default)
//! image-pipeline
//!
//! # Sequential processing
//! image-pipeline --concurrent=false
//!
//! # Show per-stage lifecycle on stderr
//! RUST_LOG=image_pipeline=debug image-pipeline
//! ```

use clap::{ArgAction, Parser};
use console::{style, Term};
use image_pipeline::core::job::OutputLayout;
use image_pipeline::core::pipeline::{ExecutionMode, Pipeline};
use image_pipeline::events::{Event, EventChannel, ItemEvent};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

/// Images processed on every run
const DEFAULT_INPUTS: [&str; 4] = [
    "images/image1.png",
    "images/image2.png",
    "images/image3.png",
    "images/image4.png",
];

/// Image Pipeline - resize and grayscale a batch of images
#[derive(Parser, Debug)]
#[command(name = "image-pipeline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Process images with one thread per stage (false = sequential)
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    concurrent: bool,
}

impl Cli {
    fn mode(&self) -> ExecutionMode {
        if self.concurrent {
            ExecutionMode::Concurrent
        } else {
            ExecutionMode::Sequential
        }
    }
}

/// Run the CLI.
///
/// Never fails: problems are logged and the process still exits 0.
pub fn run() {
    image_pipeline::init_tracing();
    let cli = Cli::parse();
    let mode = cli.mode();
    let term = Term::stdout();

    let start_time = Instant::now();

    let headline = match mode {
        ExecutionMode::Concurrent => "Processing with the concurrent pipeline",
        ExecutionMode::Sequential => "Processing sequentially",
    };
    term.write_line(&format!("{}", style(headline).bold().cyan()))
        .ok();

    let pipeline = match Pipeline::builder()
        .sources(DEFAULT_INPUTS.iter().map(PathBuf::from).collect())
        .layout(OutputLayout::default())
        .build()
    {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = %e, "Failed to configure pipeline");
            print_elapsed(&term, start_time);
            return;
        }
    };

    let (sender, receiver) = EventChannel::new();

    // Report outcomes as they arrive
    let status_term = term.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            if let Event::Item(ItemEvent::Finished(outcome)) = event {
                let line = if outcome.is_success() {
                    style("Success!").green().to_string()
                } else {
                    style("Failed!").red().to_string()
                };
                status_term.write_line(&line).ok();
            }
        }
    });

    if let Err(e) = pipeline.run_with_events(mode, &sender) {
        tracing::error!(error = %e, "Pipeline stopped early");
    }

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    print_elapsed(&term, start_time);
}

fn print_elapsed(term: &Term, start_time: Instant) {
    term.write_line(&format!(
        "Processing took {}",
        style(format!("{:?}", start_time.elapsed())).dim()
    ))
    .ok();
}
