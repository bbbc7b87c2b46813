use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use uuid::Uuid;

use cashbook_core::{CashbookId, ExpectedVersion};
use cashbook_events::Event;

/// An encoded event waiting to be appended; the store assigns its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,
    pub payload: JsonValue,
}

impl PendingEvent {
    /// Serialize a ledger event, keeping the schema it was written with.
    pub fn encode<E>(event: &E) -> Result<Self, EventStoreError>
    where
        E: Event + Serialize,
    {
        let payload =
            serde_json::to_value(event).map_err(|e| EventStoreError::Encode(e.to_string()))?;
        let schema = event.schema();

        Ok(Self {
            event_id: Uuid::now_v7(),
            event_type: schema.event_type.to_string(),
            event_version: schema.version,
            occurred_at: event.occurred_at(),
            payload,
        })
    }
}

/// An event at its place in a cashbook stream.
///
/// Positions start at 1 and have no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub cashbook_id: CashbookId,
    pub position: u64,
    pub event_id: Uuid,
    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,
    pub payload: JsonValue,
}

impl RecordedEvent {
    pub(crate) fn recorded(cashbook_id: CashbookId, position: u64, pending: PendingEvent) -> Self {
        Self {
            cashbook_id,
            position,
            event_id: pending.event_id,
            event_type: pending.event_type,
            event_version: pending.event_version,
            occurred_at: pending.occurred_at,
            payload: pending.payload,
        }
    }
}

#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Someone else appended to the stream since it was read.
    #[error("cashbook {cashbook_id} is at version {actual}, expected {expected:?}")]
    Concurrency {
        cashbook_id: CashbookId,
        expected: ExpectedVersion,
        actual: u64,
    },

    #[error("could not encode event payload: {0}")]
    Encode(String),

    /// A loaded stream breaks the position or ownership rules.
    #[error("stream of cashbook {0} is corrupted: {1}")]
    Corrupted(CashbookId, String),

    #[error("event store lock poisoned")]
    Poisoned,
}

/// Storage for cashbook streams.
pub trait EventStore: Send + Sync {
    /// Append `events` to the stream of `cashbook_id` if it is at `expected`.
    ///
    /// The batch is recorded entirely or not at all. An empty batch is a no-op.
    fn append(
        &self,
        cashbook_id: CashbookId,
        expected: ExpectedVersion,
        events: Vec<PendingEvent>,
    ) -> Result<Vec<RecordedEvent>, EventStoreError>;

    /// Every event of the cashbook in position order (empty if it has none).
    fn load_stream(&self, cashbook_id: CashbookId) -> Result<Vec<RecordedEvent>, EventStoreError>;
}
