//! # Pipeline Module
//!
//! Orchestrates the load → resize → grayscale → save workflow.
//!
//! ## Pipeline Stages
//! 1. **Load** - Decode the source file (failures are logged and dropped)
//! 2. **Resize** - Scale to the configured dimensions
//! 3. **Grayscale** - Collapse to 8-bit luma
//! 4. **Save** - Encode to the destination, yielding one [`Outcome`](crate::core::job::Outcome)
//!
//! ## Concurrency
//! In [`ExecutionMode::Concurrent`] every stage runs on its own thread and
//! hands items to the next over a single-producer/single-consumer queue.
//! A stage closes its output once its input is closed and drained, which is
//! how end-of-work travels down the chain. [`ExecutionMode::Sequential`]
//! runs the same stage bodies one image at a time on the calling thread.

mod executor;
mod queue;
mod sequential;
mod stage;
mod stages;

pub use executor::{ExecutionMode, Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
pub use queue::{handoff, source_queue, QueueCapacity};
pub use stage::{drive, CancellationToken, Stage, StageReport, StageRunner, StageState};
pub use stages::{LoadStage, SaveStage, TransformStage};
