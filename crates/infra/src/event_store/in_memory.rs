use std::collections::HashMap;
use std::sync::RwLock;

use cashbook_core::{CashbookId, ExpectedVersion};

use super::stream::{EventStore, EventStoreError, PendingEvent, RecordedEvent};

/// Cashbook streams held in process memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<CashbookId, Vec<RecordedEvent>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cashbooks with at least one recorded event.
    pub fn stream_count(&self) -> Result<usize, EventStoreError> {
        let streams = self.streams.read().map_err(|_| EventStoreError::Poisoned)?;
        Ok(streams.len())
    }
}

impl EventStore for InMemoryEventStore {
    fn append(
        &self,
        cashbook_id: CashbookId,
        expected: ExpectedVersion,
        events: Vec<PendingEvent>,
    ) -> Result<Vec<RecordedEvent>, EventStoreError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let mut streams = self.streams.write().map_err(|_| EventStoreError::Poisoned)?;

        let actual = streams
            .get(&cashbook_id)
            .and_then(|stream| stream.last())
            .map_or(0, |last| last.position);
        if !expected.matches(actual) {
            return Err(EventStoreError::Concurrency {
                cashbook_id,
                expected,
                actual,
            });
        }

        let recorded: Vec<RecordedEvent> = events
            .into_iter()
            .zip(actual + 1..)
            .map(|(pending, position)| RecordedEvent::recorded(cashbook_id, position, pending))
            .collect();

        // Only a successful append creates the stream.
        streams
            .entry(cashbook_id)
            .or_default()
            .extend(recorded.iter().cloned());

        Ok(recorded)
    }

    fn load_stream(&self, cashbook_id: CashbookId) -> Result<Vec<RecordedEvent>, EventStoreError> {
        let streams = self.streams.read().map_err(|_| EventStoreError::Poisoned)?;
        Ok(streams.get(&cashbook_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn joined(name: &str) -> PendingEvent {
        PendingEvent {
            event_id: Uuid::now_v7(),
            event_type: "cashbook.participant_added".to_string(),
            event_version: 1,
            occurred_at: Utc::now(),
            payload: json!({ "name": name }),
        }
    }

    fn positions(events: &[RecordedEvent]) -> Vec<u64> {
        events.iter().map(|e| e.position).collect()
    }

    #[test]
    fn positions_continue_across_appends() {
        let store = InMemoryEventStore::new();
        let id = CashbookId::new();

        let first = store
            .append(id, ExpectedVersion::NoStream, vec![joined("Anna"), joined("Ben")])
            .unwrap();
        let second = store
            .append(id, ExpectedVersion::Exact(2), vec![joined("Cleo")])
            .unwrap();

        assert_eq!(positions(&first), vec![1, 2]);
        assert_eq!(positions(&second), vec![3]);
        let stream = store.load_stream(id).unwrap();
        assert_eq!(positions(&stream), vec![1, 2, 3]);
        assert!(stream.iter().all(|e| e.cashbook_id == id));
    }

    #[test]
    fn stale_expected_version_is_rejected() {
        let store = InMemoryEventStore::new();
        let id = CashbookId::new();
        store
            .append(id, ExpectedVersion::NoStream, vec![joined("Anna")])
            .unwrap();

        let err = store
            .append(id, ExpectedVersion::NoStream, vec![joined("Ben")])
            .unwrap_err();
        assert!(matches!(
            err,
            EventStoreError::Concurrency { actual: 1, expected: ExpectedVersion::NoStream, .. }
        ));
        assert_eq!(store.load_stream(id).unwrap().len(), 1);
    }

    #[test]
    fn rejected_append_to_unknown_cashbook_leaves_no_stream() {
        let store = InMemoryEventStore::new();
        let id = CashbookId::new();

        let err = store
            .append(id, ExpectedVersion::Exact(3), vec![joined("Anna")])
            .unwrap_err();
        assert!(matches!(err, EventStoreError::Concurrency { actual: 0, .. }));
        assert_eq!(store.stream_count().unwrap(), 0);
        assert!(store.load_stream(id).unwrap().is_empty());
    }

    #[test]
    fn streams_are_isolated_per_cashbook() {
        let store = InMemoryEventStore::new();
        let a = CashbookId::new();
        let b = CashbookId::new();
        store
            .append(a, ExpectedVersion::NoStream, vec![joined("Anna")])
            .unwrap();
        store
            .append(b, ExpectedVersion::NoStream, vec![joined("Ben")])
            .unwrap();

        assert_eq!(store.stream_count().unwrap(), 2);
        assert_eq!(positions(&store.load_stream(b).unwrap()), vec![1]);
    }

    #[test]
    fn empty_batch_records_nothing() {
        let store = InMemoryEventStore::new();
        let id = CashbookId::new();

        assert!(store.append(id, ExpectedVersion::Any, vec![]).unwrap().is_empty());
        assert_eq!(store.stream_count().unwrap(), 0);
    }
}
