//! Infrastructure layer: event storage and command execution.

pub mod command_dispatcher;
pub mod event_store;

pub use command_dispatcher::{CommandDispatcher, DispatchError};
pub use event_store::{EventStore, EventStoreError, InMemoryEventStore, PendingEvent, RecordedEvent};
