//! Event type definitions for progress reporting.

use crate::core::job::Outcome;
use crate::core::pipeline::ExecutionMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the image pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Run-level events
    Pipeline(PipelineEvent),
    /// Per-image events
    Item(ItemEvent),
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// A run has started
    Started {
        mode: ExecutionMode,
        total_items: usize,
    },
    /// Every queue has drained and all stages have exited
    Completed { summary: PipelineSummary },
    /// The run observed its cancellation token
    Cancelled,
}

/// Per-image events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemEvent {
    /// The source decoded and entered the pipeline
    Loaded { source: PathBuf },
    /// The source failed to decode; no outcome will follow
    Dropped { source: PathBuf, reason: String },
    /// The item reached the save step
    Finished(Outcome),
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Number of source paths submitted
    pub total_items: usize,
    /// Sources that decoded successfully
    pub loaded: usize,
    /// Sources that failed to decode
    pub dropped: usize,
    /// Outcomes that reported a successful write
    pub succeeded: usize,
    /// Outcomes that reported a failed write
    pub failed: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}
