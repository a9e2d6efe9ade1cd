//! Single-threaded execution of the same four steps.
//!
//! Runs the stage bodies the concurrent pipeline uses, one image at a
//! time, so both modes agree on every per-item outcome.

use super::executor::{Pipeline, RunTally};
use super::stage::Stage;
use crate::events::{Event, EventSender, ItemEvent};

pub(super) fn run(pipeline: &Pipeline, events: &EventSender) -> RunTally {
    let mut load = pipeline.load_stage(events);
    let mut resize = pipeline.resize_stage();
    let mut grayscale = pipeline.grayscale_stage();
    let mut save = pipeline.save_stage();
    let cancel = pipeline.cancellation_token();

    let mut tally = RunTally::default();

    for source in &pipeline.config().sources {
        if cancel.is_cancelled() {
            tally.cancelled = true;
            break;
        }

        let Some(item) = load.process(source.clone()) else {
            tally.dropped += 1;
            continue;
        };
        tally.loaded += 1;

        let outcome = resize
            .process(item)
            .and_then(|item| grayscale.process(item))
            .and_then(|item| save.process(item));

        if let Some(outcome) = outcome {
            events.send(Event::Item(ItemEvent::Finished(outcome.clone())));
            tally.outcomes.push(outcome);
        }
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::OutputLayout;
    use crate::core::pipeline::ExecutionMode;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn sequential_outcomes_follow_submission_order() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("output")).unwrap();
        let sources: Vec<PathBuf> = ["c.png", "a.png", "b.png"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                RgbImage::from_pixel(5, 5, Rgb([1, 2, 3])).save(&path).unwrap();
                path
            })
            .collect();

        let pipeline = Pipeline::builder()
            .sources(sources.clone())
            .layout(OutputLayout::new(dir.path(), dir.path().join("output")))
            .build()
            .unwrap();

        let result = pipeline.run(ExecutionMode::Sequential).unwrap();
        let order: Vec<_> = result.outcomes.iter().map(|o| o.source.clone()).collect();

        assert_eq!(order, sources);
        assert_eq!(result.summary.loaded, 3);
    }

    #[test]
    fn sequential_skips_undecodable_and_reports_write_failures() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        RgbImage::new(4, 4).save(&good).unwrap();

        // No output directory: every decoded item fails to save
        let pipeline = Pipeline::builder()
            .sources(vec![good.clone(), dir.path().join("missing.png")])
            .layout(OutputLayout::new(dir.path(), dir.path().join("output")))
            .build()
            .unwrap();

        let result = pipeline.run(ExecutionMode::Sequential).unwrap();

        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.outcomes[0].source, good);
        assert!(!result.outcomes[0].is_success());
        assert_eq!(result.summary.dropped, 1);
        assert_eq!(result.summary.failed, 1);
    }
}
