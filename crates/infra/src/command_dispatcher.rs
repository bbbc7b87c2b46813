//! Command execution pipeline for event-sourced cashbooks.
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the cashbook's stream
//!   ↓
//! 2. Rehydrate the aggregate (apply historical events in order)
//!   ↓
//! 3. Handle the command (pure decision logic, produces events)
//!   ↓
//! 4. Append the events (optimistic concurrency on the loaded version)
//!   ↓
//! 5. Apply the committed events and hand back the new state
//! ```
//!
//! This module contains no IO itself; it composes the `EventStore` trait.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use cashbook_core::{Aggregate, CashbookId, DomainError, ExpectedVersion};

use crate::event_store::{EventStore, EventStoreError, PendingEvent, RecordedEvent};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Optimistic concurrency failure or a conflicting command (e.g. duplicate name).
    #[error("conflict: {0}")]
    Conflict(String),
    /// Domain validation failure (deterministic).
    #[error("validation failed: {0}")]
    Validation(String),
    /// Domain invariant failure (deterministic).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// The cashbook does not exist.
    #[error("not found")]
    NotFound,
    /// Failed to deserialize historical event payloads into the aggregate event type.
    #[error("failed to deserialize stored event: {0}")]
    Deserialize(String),
    /// The event store rejected or failed the operation.
    #[error("event store failure: {0}")]
    Store(EventStoreError),
}

impl From<EventStoreError> for DispatchError {
    fn from(value: EventStoreError) -> Self {
        match value {
            e @ EventStoreError::Concurrency { .. } => DispatchError::Conflict(e.to_string()),
            other => DispatchError::Store(other),
        }
    }
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DispatchError::Validation(msg),
            e @ DomainError::UnknownParticipant(_) => DispatchError::Validation(e.to_string()),
            DomainError::InvariantViolation(msg) => DispatchError::InvariantViolation(msg),
            DomainError::Conflict(msg) => DispatchError::Conflict(msg),
            DomainError::NotFound => DispatchError::NotFound,
            DomainError::InvalidId(msg) => DispatchError::Validation(msg),
        }
    }
}

/// Runs cashbook commands against their event streams.
///
/// Concurrent commands against the same cashbook race on the append: the
/// loser gets [`DispatchError::Conflict`] and may reload and retry.
#[derive(Debug)]
pub struct CommandDispatcher<S> {
    store: S,
}

impl<S> CommandDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> CommandDispatcher<S>
where
    S: EventStore,
{
    /// Run `command` against the cashbook `cashbook_id` and return its new state.
    ///
    /// `make_aggregate` builds the empty instance that history is replayed onto.
    pub fn dispatch<A>(
        &self,
        cashbook_id: CashbookId,
        command: A::Command,
        make_aggregate: impl FnOnce(CashbookId) -> A,
    ) -> Result<A, DispatchError>
    where
        A: Aggregate<Error = DomainError>,
        A::Event: cashbook_events::Event + Serialize + DeserializeOwned,
    {
        // 1) Load history
        let history = self.store.load_stream(cashbook_id)?;
        validate_loaded_stream(cashbook_id, &history)?;
        let expected = match stream_version(&history) {
            0 => ExpectedVersion::NoStream,
            v => ExpectedVersion::Exact(v),
        };

        // 2) Rehydrate
        let mut aggregate = make_aggregate(cashbook_id);
        apply_history(&mut aggregate, &history)?;

        // 3) Decide
        let decided = aggregate.handle(&command).map_err(|e| {
            if e.is_rejected_input() {
                tracing::warn!(%cashbook_id, error = %e, "command rejected");
            }
            DispatchError::from(e)
        })?;
        if decided.is_empty() {
            return Ok(aggregate);
        }

        // 4) Persist
        let pending = decided
            .iter()
            .map(PendingEvent::encode)
            .collect::<Result<Vec<_>, _>>()?;

        let committed = self.store.append(cashbook_id, expected, pending)?;
        tracing::info!(
            %cashbook_id,
            events = committed.len(),
            version = stream_version(&committed),
            "events committed"
        );

        // 5) Evolve
        for event in &decided {
            aggregate.apply(event);
        }

        Ok(aggregate)
    }

    /// Rebuild a cashbook from its stream; `None` if nothing was ever recorded.
    pub fn load<A>(
        &self,
        cashbook_id: CashbookId,
        make_aggregate: impl FnOnce(CashbookId) -> A,
    ) -> Result<Option<A>, DispatchError>
    where
        A: Aggregate,
        A::Event: cashbook_events::Event + DeserializeOwned,
    {
        let history = self.store.load_stream(cashbook_id)?;
        if history.is_empty() {
            return Ok(None);
        }
        validate_loaded_stream(cashbook_id, &history)?;

        let mut aggregate = make_aggregate(cashbook_id);
        apply_history(&mut aggregate, &history)?;
        Ok(Some(aggregate))
    }
}

fn stream_version(stream: &[RecordedEvent]) -> u64 {
    stream.last().map_or(0, |e| e.position)
}

/// Positions must run 1, 2, 3, ... and every event must belong to the cashbook.
fn validate_loaded_stream(
    cashbook_id: CashbookId,
    stream: &[RecordedEvent],
) -> Result<(), DispatchError> {
    for (expected, e) in (1u64..).zip(stream) {
        if e.cashbook_id != cashbook_id {
            return Err(DispatchError::Store(EventStoreError::Corrupted(
                cashbook_id,
                format!("event {} belongs to cashbook {}", e.event_id, e.cashbook_id),
            )));
        }
        if e.position != expected {
            return Err(DispatchError::Store(EventStoreError::Corrupted(
                cashbook_id,
                format!("expected position {expected}, found {}", e.position),
            )));
        }
    }
    Ok(())
}

fn apply_history<A>(aggregate: &mut A, history: &[RecordedEvent]) -> Result<(), DispatchError>
where
    A: Aggregate,
    A::Event: cashbook_events::Event + DeserializeOwned,
{
    use cashbook_events::Event as _;

    for stored in history {
        let ev: A::Event = serde_json::from_value(stored.payload.clone())
            .map_err(|e| DispatchError::Deserialize(e.to_string()))?;

        // The payload must decode to the schema recorded next to it.
        let schema = ev.schema();
        if !schema.describes(&stored.event_type, stored.event_version) {
            return Err(DispatchError::Deserialize(format!(
                "event {} recorded as {}@v{} decoded as {schema}",
                stored.event_id, stored.event_type, stored.event_version
            )));
        }

        aggregate.apply(&ev);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use cashbook_core::{AggregateRoot, PaymentId};
    use cashbook_ledger::{AddParticipant, Cashbook, CashbookCommand, CreateCashbook, RecordPayment};
    use chrono::Utc;

    use crate::event_store::InMemoryEventStore;

    fn dispatcher() -> CommandDispatcher<InMemoryEventStore> {
        CommandDispatcher::new(InMemoryEventStore::new())
    }

    fn run(
        d: &CommandDispatcher<InMemoryEventStore>,
        command: CashbookCommand,
    ) -> Result<Cashbook, DispatchError> {
        d.dispatch(command.cashbook_id(), command, Cashbook::empty)
    }

    fn create(id: CashbookId) -> CashbookCommand {
        CashbookCommand::CreateCashbook(CreateCashbook {
            cashbook_id: id,
            trip_name: "Oslo".to_string(),
            occurred_at: Utc::now(),
        })
    }

    fn join(id: CashbookId, name: &str) -> CashbookCommand {
        CashbookCommand::AddParticipant(AddParticipant {
            cashbook_id: id,
            name: name.to_string(),
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn dispatch_persists_and_load_rehydrates() {
        let d = dispatcher();
        let id = CashbookId::new();

        run(&d, create(id)).unwrap();
        run(&d, join(id, "Anna")).unwrap();
        let after = run(
            &d,
            CashbookCommand::RecordPayment(RecordPayment {
                cashbook_id: id,
                payment_id: PaymentId::new(),
                amount: 80.0,
                description: "ferry".to_string(),
                payer: "Anna".to_string(),
                occurred_at: Utc::now(),
            }),
        )
        .unwrap();
        assert_eq!(after.version(), 3);

        let loaded: Cashbook = d.load(id, Cashbook::empty).unwrap().unwrap();
        assert_eq!(loaded, after);
        assert_eq!(d.store().load_stream(id).unwrap().len(), 3);
    }

    #[test]
    fn unknown_cashbook_loads_as_none_and_rejects_commands() {
        let d = dispatcher();
        let id = CashbookId::new();

        assert!(d.load(id, Cashbook::empty).unwrap().is_none());
        let err = run(&d, join(id, "Anna")).unwrap_err();
        assert!(matches!(err, DispatchError::NotFound));
        assert!(d.store().load_stream(id).unwrap().is_empty());
    }

    #[test]
    fn domain_rejections_are_not_persisted() {
        let d = dispatcher();
        let id = CashbookId::new();
        run(&d, create(id)).unwrap();
        run(&d, join(id, "Anna")).unwrap();

        let err = run(&d, join(id, "Anna")).unwrap_err();
        assert!(matches!(err, DispatchError::Conflict(_)));
        assert_eq!(d.store().load_stream(id).unwrap().len(), 2);
    }

    #[test]
    fn stale_writer_gets_a_conflict() {
        let d = dispatcher();
        let id = CashbookId::new();
        run(&d, create(id)).unwrap();

        // Simulate a concurrent writer: decide against version 1, then let
        // another command land first.
        let stale: Cashbook = d.load(id, Cashbook::empty).unwrap().unwrap();
        let events = stale.handle(&join(id, "Ben")).unwrap();
        run(&d, join(id, "Anna")).unwrap();

        let pending = events.iter().map(|ev| PendingEvent::encode(ev).unwrap()).collect();
        let err = d
            .store()
            .append(id, ExpectedVersion::Exact(stale.version()), pending)
            .map_err(DispatchError::from)
            .unwrap_err();
        assert!(matches!(err, DispatchError::Conflict(_)));
    }

    #[test]
    fn mislabelled_history_is_refused() {
        let d = dispatcher();
        let id = CashbookId::new();
        run(&d, create(id)).unwrap();

        let events = Cashbook::empty(id).handle(&create(id)).unwrap();
        let mut record = PendingEvent::encode(&events[0]).unwrap();
        record.event_type = "cashbook.participant_added".to_string();
        d.store().append(id, ExpectedVersion::Exact(1), vec![record]).unwrap();

        let err = d.load(id, Cashbook::empty).unwrap_err();
        assert!(matches!(err, DispatchError::Deserialize(_)));
    }

    #[test]
    fn checkout_of_rehydrated_cashbook() {
        let d = dispatcher();
        let id = CashbookId::new();
        run(&d, create(id)).unwrap();
        for name in ["A", "B"] {
            run(&d, join(id, name)).unwrap();
        }
        run(
            &d,
            CashbookCommand::RecordPayment(RecordPayment {
                cashbook_id: id,
                payment_id: PaymentId::new(),
                amount: 100.0,
                description: String::new(),
                payer: "A".to_string(),
                occurred_at: Utc::now(),
            }),
        )
        .unwrap();

        let cashbook: Cashbook = d.load(id, Cashbook::empty).unwrap().unwrap();
        let result = cashbook.checkout().unwrap();
        assert_eq!(
            result.checkout.transactions,
            vec![cashbook_checkout::Transaction {
                from: "B".to_string(),
                to: "A".to_string(),
                amount: 50.0,
            }]
        );
    }
}
