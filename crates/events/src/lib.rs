//! Domain events.
//!
//! Cashbooks are event-sourced: every mutation is recorded as an immutable
//! event and state is rebuilt by replaying the stream.

pub mod event;

pub use event::{Event, EventSchema};
