//! Pipeline execution implementation.

use super::queue::{source_queue, QueueCapacity};
use super::sequential;
use super::stage::{CancellationToken, StageReport, StageRunner};
use super::stages::{LoadStage, SaveStage, TransformStage};
use crate::core::codec::{FileCodec, ImageCodec};
use crate::core::job::{OutputLayout, Outcome};
use crate::core::transform::{FastResizer, Grayscale, ResizeConfig};
use crate::error::{PipelineError, Result};
use crate::events::{null_sender, Event, EventSender, ItemEvent, PipelineEvent, PipelineSummary};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How a run schedules its work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// One thread per stage, connected by handoff queues
    #[default]
    Concurrent,
    /// All four steps for one image before the next, on the calling thread
    Sequential,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Concurrent => write!(f, "concurrent pipeline"),
            ExecutionMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Mode the run used
    pub mode: ExecutionMode,
    /// One outcome per source that decoded, in completion order
    pub outcomes: Vec<Outcome>,
    /// Counts and duration
    pub summary: PipelineSummary,
    /// Total wall-clock time
    pub duration: Duration,
    /// Work was abandoned because the token was cancelled mid-run
    pub cancelled: bool,
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Source images, processed in this order; duplicates are processed twice
    pub sources: Vec<PathBuf>,
    /// Where outputs go
    pub layout: OutputLayout,
    /// Resize target
    pub resize: ResizeConfig,
    /// Buffering between stages
    pub queue_capacity: QueueCapacity,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    codec: Option<Arc<dyn ImageCodec>>,
    cancel: Option<CancellationToken>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            codec: None,
            cancel: None,
        }
    }

    /// Set the images to process
    pub fn sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.config.sources = sources;
        self
    }

    /// Append one image to process
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.sources.push(source.into());
        self
    }

    /// Set the input/output directory mapping
    pub fn layout(mut self, layout: OutputLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Set the resize target
    pub fn resize(mut self, resize: ResizeConfig) -> Self {
        self.config.resize = resize;
        self
    }

    /// Set the capacity of the queues between stages
    pub fn queue_capacity(mut self, capacity: QueueCapacity) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Replace the filesystem codec
    pub fn codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Use an externally owned cancellation token
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<Pipeline> {
        let ResizeConfig { width, height } = self.config.resize;
        if width == 0 || height == 0 {
            return Err(PipelineError::Config(format!(
                "Resize dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }

        if self.config.queue_capacity == QueueCapacity::Bounded(0) {
            return Err(PipelineError::Config(
                "Bounded queue capacity must be at least 1; use Rendezvous for an unbuffered handoff"
                    .to_string(),
            ));
        }

        Ok(Pipeline {
            config: self.config,
            codec: self.codec.unwrap_or_else(|| Arc::new(FileCodec::new())),
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What a run produced, before timing is attached
#[derive(Debug, Default)]
pub(super) struct RunTally {
    pub outcomes: Vec<Outcome>,
    pub loaded: usize,
    pub dropped: usize,
    /// Some source or in-flight item was skipped after cancellation
    pub cancelled: bool,
}

/// The image processing pipeline
pub struct Pipeline {
    config: PipelineConfig,
    codec: Arc<dyn ImageCodec>,
    cancel: CancellationToken,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Token that stops this pipeline's runs when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the pipeline without events
    pub fn run(&self, mode: ExecutionMode) -> Result<PipelineResult> {
        self.run_with_events(mode, &null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Item failures never make this return `Err`; only a stage thread that
    /// cannot be started does.
    pub fn run_with_events(
        &self,
        mode: ExecutionMode,
        events: &EventSender,
    ) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let total_items = self.config.sources.len();

        tracing::info!(%mode, total_items, "pipeline started");
        events.send(Event::Pipeline(PipelineEvent::Started { mode, total_items }));

        let tally = match mode {
            ExecutionMode::Concurrent => self.run_concurrent(events)?,
            ExecutionMode::Sequential => sequential::run(self, events),
        };

        let duration = start_time.elapsed();
        let cancelled = tally.cancelled;
        let succeeded = tally.outcomes.iter().filter(|o| o.is_success()).count();

        let summary = PipelineSummary {
            total_items,
            loaded: tally.loaded,
            dropped: tally.dropped,
            succeeded,
            failed: tally.outcomes.len() - succeeded,
            duration_ms: duration.as_millis() as u64,
        };

        if cancelled {
            events.send(Event::Pipeline(PipelineEvent::Cancelled));
        }
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: summary.clone(),
        }));
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            dropped = summary.dropped,
            ?duration,
            "pipeline finished"
        );

        Ok(PipelineResult {
            mode,
            outcomes: tally.outcomes,
            summary,
            duration,
            cancelled,
        })
    }

    /// Spawn the four stages and drain the outcome queue until it closes
    fn run_concurrent(&self, events: &EventSender) -> Result<RunTally> {
        let runner = StageRunner::new(self.config.queue_capacity, self.cancel.clone());

        let sources = source_queue(&self.config.sources);
        let (loaded, load) = runner.spawn(self.load_stage(events), sources)?;
        let (resized, resize) = runner.spawn(self.resize_stage(), loaded)?;
        let (grayed, grayscale) = runner.spawn(self.grayscale_stage(), resized)?;
        let (results, save) = runner.spawn(self.save_stage(), grayed)?;

        let mut outcomes = Vec::new();
        for outcome in results.iter() {
            events.send(Event::Item(ItemEvent::Finished(outcome.clone())));
            outcomes.push(outcome);
        }

        let load_report = join_stage(load);
        let mut cancelled = load_report.as_ref().is_some_and(|r| r.cancelled);
        for handle in [resize, grayscale, save] {
            cancelled |= join_stage(handle).is_some_and(|r| r.cancelled);
        }

        let (loaded, dropped) = match load_report {
            Some(report) => (report.forwarded, report.dropped),
            None => (outcomes.len(), 0),
        };

        Ok(RunTally {
            outcomes,
            loaded,
            dropped,
            cancelled,
        })
    }

    pub(super) fn load_stage(&self, events: &EventSender) -> LoadStage {
        LoadStage::new(
            Arc::clone(&self.codec),
            self.config.layout.clone(),
            events.clone(),
        )
    }

    pub(super) fn resize_stage(&self) -> TransformStage<FastResizer> {
        TransformStage::new(FastResizer::new(self.config.resize))
    }

    pub(super) fn grayscale_stage(&self) -> TransformStage<Grayscale> {
        TransformStage::new(Grayscale)
    }

    pub(super) fn save_stage(&self) -> SaveStage {
        SaveStage::new(Arc::clone(&self.codec))
    }
}

/// Wait for a stage thread; a panic is logged rather than propagated
fn join_stage(handle: JoinHandle<StageReport>) -> Option<StageReport> {
    let thread = handle.thread().name().unwrap_or("stage").to_string();
    match handle.join() {
        Ok(report) => Some(report),
        Err(_) => {
            tracing::warn!(%thread, "stage thread panicked");
            None
        }
    }
}
