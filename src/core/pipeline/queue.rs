//! Handoff queues between stages.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::path::PathBuf;

/// How many items a handoff queue may buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueCapacity {
    /// No buffer: a send waits until the next stage takes the item
    #[default]
    Rendezvous,
    /// Up to `n` buffered items before a send blocks
    Bounded(usize),
    /// Sends never block
    Unbounded,
}

/// Create a handoff queue.
///
/// The queue closes when its `Sender` is dropped; after that `recv`
/// drains what is left and then returns `Err`.
pub fn handoff<T>(capacity: QueueCapacity) -> (Sender<T>, Receiver<T>) {
    match capacity {
        QueueCapacity::Rendezvous => bounded(0),
        QueueCapacity::Bounded(n) => bounded(n),
        QueueCapacity::Unbounded => unbounded(),
    }
}

/// A closed queue pre-filled with the sources, in order.
///
/// Feeds the load stage the same way every other stage is fed.
pub fn source_queue(sources: &[PathBuf]) -> Receiver<PathBuf> {
    let (sender, receiver) = unbounded();
    for source in sources {
        // The receiver is still in scope, so this cannot fail
        let _ = sender.send(source.clone());
    }
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn source_queue_preserves_order_and_closes() {
        let sources = vec![
            PathBuf::from("a.png"),
            PathBuf::from("b.png"),
            PathBuf::from("a.png"),
        ];
        let receiver = source_queue(&sources);

        let drained: Vec<_> = receiver.iter().collect();
        assert_eq!(drained, sources);
        assert!(receiver.recv().is_err());
    }

    #[test]
    fn empty_source_queue_is_closed_immediately() {
        let receiver = source_queue(&[]);
        assert!(receiver.recv().is_err());
    }

    #[test]
    fn rendezvous_send_waits_for_receiver() {
        let (sender, receiver) = handoff::<u32>(QueueCapacity::Rendezvous);
        assert!(sender.try_send(1).is_err());

        let consumer = thread::spawn(move || receiver.recv().unwrap());
        sender.send(7).unwrap();
        assert_eq!(consumer.join().unwrap(), 7);
    }

    #[test]
    fn bounded_queue_buffers_up_to_capacity() {
        let (sender, receiver) = handoff::<u32>(QueueCapacity::Bounded(2));
        assert!(sender.try_send(1).is_ok());
        assert!(sender.try_send(2).is_ok());
        assert!(sender.try_send(3).is_err());
        drop(sender);

        assert_eq!(receiver.iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn unbounded_queue_never_blocks() {
        let (sender, receiver) = handoff::<u32>(QueueCapacity::Unbounded);
        for i in 0..1000 {
            sender.try_send(i).unwrap();
        }
        drop(sender);
        assert_eq!(receiver.iter().count(), 1000);
    }

    #[test]
    fn closed_queue_still_drains_buffered_items() {
        let (sender, receiver) = handoff::<u32>(QueueCapacity::Bounded(4));
        sender.send(1).unwrap();
        sender.send(2).unwrap();
        drop(sender);

        assert_eq!(receiver.recv().ok(), Some(1));
        assert_eq!(receiver.recv().ok(), Some(2));
        assert!(receiver.recv().is_err());
    }
}
