//! The load, transform and save stage bodies.

use super::stage::Stage;
use crate::core::codec::ImageCodec;
use crate::core::job::{OutputLayout, Outcome, WorkItem};
use crate::core::transform::ImageTransform;
use crate::events::{Event, EventSender, ItemEvent};
use std::path::PathBuf;
use std::sync::Arc;

/// Decodes sources into work items.
///
/// A source that fails to decode is logged and dropped; it never produces
/// an outcome.
pub struct LoadStage {
    codec: Arc<dyn ImageCodec>,
    layout: OutputLayout,
    events: EventSender,
}

impl LoadStage {
    pub fn new(codec: Arc<dyn ImageCodec>, layout: OutputLayout, events: EventSender) -> Self {
        Self {
            codec,
            layout,
            events,
        }
    }
}

impl Stage for LoadStage {
    type Input = PathBuf;
    type Output = WorkItem;

    fn name(&self) -> &'static str {
        "load"
    }

    fn process(&mut self, source: PathBuf) -> Option<WorkItem> {
        match self.codec.decode(&source) {
            Ok(image) => {
                let destination = self.layout.destination_for(&source);
                self.events.send(Event::Item(ItemEvent::Loaded {
                    source: source.clone(),
                }));
                Some(WorkItem::new(source, destination, image))
            }
            Err(e) => {
                tracing::error!(path = %source.display(), error = %e, "Error reading image");
                self.events.send(Event::Item(ItemEvent::Dropped {
                    source,
                    reason: e.to_string(),
                }));
                None
            }
        }
    }
}

/// Applies an [`ImageTransform`] to each item's payload
pub struct TransformStage<T> {
    transform: T,
}

impl<T: ImageTransform> TransformStage<T> {
    pub fn new(transform: T) -> Self {
        Self { transform }
    }
}

impl<T: ImageTransform + 'static> Stage for TransformStage<T> {
    type Input = WorkItem;
    type Output = WorkItem;

    fn name(&self) -> &'static str {
        self.transform.name()
    }

    fn process(&mut self, item: WorkItem) -> Option<WorkItem> {
        let (image, slot) = item.take_image();
        Some(slot.fill(self.transform.apply(image)))
    }
}

/// Encodes items to their destination, one outcome per item
pub struct SaveStage {
    codec: Arc<dyn ImageCodec>,
}

impl SaveStage {
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec }
    }
}

impl Stage for SaveStage {
    type Input = WorkItem;
    type Output = Outcome;

    fn name(&self) -> &'static str {
        "save"
    }

    fn process(&mut self, item: WorkItem) -> Option<Outcome> {
        let (source, destination, image) = item.into_parts();

        let outcome = match self.codec.encode(&destination, &image) {
            Ok(()) => Outcome::success(source, destination),
            Err(e) => {
                tracing::error!(path = %destination.display(), error = %e, "Error writing image");
                Outcome::failure(source, destination, e.to_string())
            }
        };
        Some(outcome)
    }
}
