//! Append-only event storage: one stream per cashbook.
//!
//! A stream's version is the position of its last event (0 while empty).
//! Appends are conditional on that version, which is how concurrent
//! commands against the same cashbook are detected.

pub mod in_memory;
pub mod stream;

pub use in_memory::InMemoryEventStore;
pub use stream::{EventStore, EventStoreError, PendingEvent, RecordedEvent};
