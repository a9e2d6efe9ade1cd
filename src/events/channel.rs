//! Event channel implementation using crossbeam-channel.
//!
//! Stage threads and the driver share one cloned sender; the front end
//! drains the receiver on its own thread.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the core library.
///
/// Cheap to clone; every stage thread holds its own copy.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is dropped, the event is silently discarded.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Returns an iterator over received events.
    ///
    /// Ends once every sender has been dropped.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for event channel pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A no-op event sender for runs without a listener.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ItemEvent, PipelineEvent};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Item(ItemEvent::Loaded {
                source: PathBuf::from("images/image1.png"),
            }));
        });

        handle.join().unwrap();

        match receiver.iter().next().unwrap() {
            Event::Item(ItemEvent::Loaded { source }) => {
                assert_eq!(source, PathBuf::from("images/image1.png"));
            }
            _ => panic!("Wrong event type"),
        };
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Pipeline(PipelineEvent::Cancelled));
    }

    #[test]
    fn iterator_ends_when_senders_drop() {
        let (sender, receiver) = EventChannel::new();
        let clone = sender.clone();

        sender.send(Event::Pipeline(PipelineEvent::Cancelled));
        clone.send(Event::Pipeline(PipelineEvent::Cancelled));
        drop(sender);
        drop(clone);

        assert_eq!(receiver.iter().count(), 2);
    }
}
