//! The stage abstraction and the thread that runs it.

use super::queue::{handoff, QueueCapacity};
use crate::error::{PipelineError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// One processing step of the pipeline.
///
/// `process` is called once per input item, in arrival order. Returning
/// `None` consumes the item without sending anything downstream.
pub trait Stage: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Short name used in logs and thread names
    fn name(&self) -> &'static str;

    fn process(&mut self, item: Self::Input) -> Option<Self::Output>;
}

/// Lifecycle of a running stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageState {
    /// Pulling and processing items
    #[default]
    Running,
    /// No more items will be pulled; the output is about to close
    Draining,
    /// Output closed, thread exiting
    Closed,
}

impl StageState {
    fn advance(self, stage: &'static str) -> Self {
        let next = match self {
            StageState::Running => StageState::Draining,
            StageState::Draining | StageState::Closed => StageState::Closed,
        };
        tracing::debug!(stage, from = ?self, to = ?next, "stage state changed");
        next
    }
}

/// Counters returned by a stage when it exits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub stage: &'static str,
    /// Items pulled from the input queue
    pub received: usize,
    /// Items sent to the output queue
    pub forwarded: usize,
    /// Items consumed without output
    pub dropped: usize,
    /// Abandoned a received item because of the cancellation token
    pub cancelled: bool,
    /// State the stage exited in
    pub state: StageState,
}

/// Cooperative cancellation shared by every stage of a run.
///
/// Checked at each receive: a stage that receives an item after
/// cancellation drops it and closes its output, which unwinds the rest of
/// the chain. A stage whose input closes normally is not cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Run a stage to completion on the current thread.
///
/// Pulls until the input is closed and empty, then drops `output` so the
/// next stage sees end-of-work. Also stops if the downstream receiver is
/// gone or an item arrives after `cancel` fired.
pub fn drive<S: Stage>(
    mut stage: S,
    input: Receiver<S::Input>,
    output: Sender<S::Output>,
    cancel: &CancellationToken,
) -> StageReport {
    let name = stage.name();
    let mut report = StageReport {
        stage: name,
        ..StageReport::default()
    };
    let mut state = StageState::Running;
    tracing::debug!(stage = name, ?state, "stage started");

    while state == StageState::Running {
        let Ok(item) = input.recv() else {
            state = state.advance(name);
            continue;
        };

        if cancel.is_cancelled() {
            report.cancelled = true;
            state = state.advance(name);
            continue;
        }
        report.received += 1;

        match stage.process(item) {
            Some(result) => {
                if output.send(result).is_ok() {
                    report.forwarded += 1;
                } else {
                    tracing::debug!(stage = name, "downstream closed, stopping");
                    state = state.advance(name);
                }
            }
            None => report.dropped += 1,
        }
    }

    drop(output);
    report.state = state.advance(name);

    tracing::debug!(
        stage = name,
        received = report.received,
        forwarded = report.forwarded,
        dropped = report.dropped,
        "stage finished"
    );
    report
}

/// Spawns stages on their own threads, wired with handoff queues
#[derive(Debug, Clone, Default)]
pub struct StageRunner {
    capacity: QueueCapacity,
    cancel: CancellationToken,
}

impl StageRunner {
    pub fn new(capacity: QueueCapacity, cancel: CancellationToken) -> Self {
        Self { capacity, cancel }
    }

    /// Start `stage` reading from `input`.
    ///
    /// Returns the receiving end of the stage's output queue and a handle
    /// that yields the stage's report once it has closed that queue.
    pub fn spawn<S: Stage>(
        &self,
        stage: S,
        input: Receiver<S::Input>,
    ) -> Result<(Receiver<S::Output>, JoinHandle<StageReport>)> {
        let name = stage.name();
        let (sender, receiver) = handoff(self.capacity);
        let cancel = self.cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("stage-{name}"))
            .spawn(move || {
                let _span = tracing::debug_span!("stage", stage = name).entered();
                drive(stage, input, sender, &cancel)
            })
            .map_err(|source| PipelineError::Spawn {
                stage: name,
                source,
            })?;

        Ok((receiver, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    struct Double;

    impl Stage for Double {
        type Input = i32;
        type Output = i32;

        fn name(&self) -> &'static str {
            "double"
        }

        fn process(&mut self, item: i32) -> Option<i32> {
            Some(item * 2)
        }
    }

    struct DropOdd;

    impl Stage for DropOdd {
        type Input = i32;
        type Output = i32;

        fn name(&self) -> &'static str {
            "drop-odd"
        }

        fn process(&mut self, item: i32) -> Option<i32> {
            (item % 2 == 0).then_some(item)
        }
    }

    fn closed_input(items: &[i32]) -> Receiver<i32> {
        let (sender, receiver) = unbounded();
        for item in items {
            sender.send(*item).unwrap();
        }
        receiver
    }

    #[test]
    fn drive_processes_in_order_and_closes_output() {
        let (sender, receiver) = unbounded();
        let report = drive(
            Double,
            closed_input(&[1, 2, 3]),
            sender,
            &CancellationToken::new(),
        );

        assert_eq!(receiver.iter().collect::<Vec<_>>(), vec![2, 4, 6]);
        assert!(receiver.recv().is_err());
        assert_eq!(report.received, 3);
        assert_eq!(report.forwarded, 3);
        assert_eq!(report.stage, "double");
    }

    #[test]
    fn drive_counts_dropped_items() {
        let (sender, receiver) = unbounded();
        let report = drive(
            DropOdd,
            closed_input(&[1, 2, 3, 4]),
            sender,
            &CancellationToken::new(),
        );

        assert_eq!(receiver.iter().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(report.dropped, 2);
        assert_eq!(report.forwarded, 2);
    }

    #[test]
    fn empty_input_closes_output_immediately() {
        let (sender, receiver) = unbounded::<i32>();
        let report = drive(Double, closed_input(&[]), sender, &CancellationToken::new());

        assert!(receiver.recv().is_err());
        assert_eq!(report, StageReport {
            stage: "double",
            state: StageState::Closed,
            ..StageReport::default()
        });
    }

    #[test]
    fn cancelled_stage_stops_pulling() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (sender, receiver) = unbounded();

        let report = drive(Double, closed_input(&[1, 2, 3]), sender, &cancel);

        assert!(report.cancelled);
        assert_eq!(report.received, 0);
        assert_eq!(report.state, StageState::Closed);
        assert!(receiver.recv().is_err());
    }

    #[test]
    fn exhausted_input_is_not_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (sender, receiver) = unbounded::<i32>();

        let report = drive(Double, closed_input(&[]), sender, &cancel);

        assert!(!report.cancelled);
        assert!(receiver.recv().is_err());
    }

    #[test]
    fn stage_drains_on_closed_input_then_closes() {
        let (input_tx, input_rx) = unbounded();
        let (sender, receiver) = unbounded();
        input_tx.send(1).unwrap();

        let worker = std::thread::spawn(move || {
            drive(Double, input_rx, sender, &CancellationToken::new())
        });

        // Open but empty: the stage keeps waiting for more work
        assert_eq!(receiver.recv().ok(), Some(2));
        input_tx.send(5).unwrap();
        assert_eq!(receiver.recv().ok(), Some(10));

        drop(input_tx);
        assert!(receiver.recv().is_err());
        let report = worker.join().unwrap();
        assert_eq!(report.state, StageState::Closed);
        assert_eq!(report.forwarded, 2);
    }

    #[test]
    fn stage_stops_when_downstream_disappears() {
        let (sender, receiver) = unbounded();
        drop(receiver);

        let report = drive(
            Double,
            closed_input(&[1, 2, 3]),
            sender,
            &CancellationToken::new(),
        );

        assert_eq!(report.received, 1);
        assert_eq!(report.forwarded, 0);
        assert_eq!(report.state, StageState::Closed);
    }

    #[test]
    fn chained_stages_drain_and_terminate() {
        let runner = StageRunner::new(QueueCapacity::Rendezvous, CancellationToken::new());
        let input = closed_input(&(1..=20).collect::<Vec<_>>());

        let (filtered, first) = runner.spawn(DropOdd, input).unwrap();
        let (doubled, second) = runner.spawn(Double, filtered).unwrap();

        let results: Vec<_> = doubled.iter().collect();
        assert_eq!(results, (1..=10).map(|n| n * 4).collect::<Vec<_>>());

        let first = first.join().unwrap();
        let second = second.join().unwrap();
        assert_eq!(first.forwarded, 10);
        assert_eq!(second.received, 10);
    }

    #[test]
    fn stage_thread_is_named() {
        let runner = StageRunner::default();
        let (_output, handle) = runner.spawn(Double, closed_input(&[])).unwrap();

        assert_eq!(handle.thread().name(), Some("stage-double"));
        handle.join().unwrap();
    }

    #[test]
    fn state_machine_ends_closed() {
        let state = StageState::Running.advance("test");
        assert_eq!(state, StageState::Draining);
        assert_eq!(state.advance("test"), StageState::Closed);
    }
}
