//! # Events Module
//!
//! Event-driven progress reporting for the image pipeline.
//!
//! ## Design
//! The core library emits events through channels, so the CLI (or any
//! other front end) can report per-item results as they arrive instead of
//! waiting for the whole batch.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Item(ItemEvent::Finished(outcome)) = event {
//!             println!("{}: {}", outcome.source.display(), outcome.is_success());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(ExecutionMode::Concurrent, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
