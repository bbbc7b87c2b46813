use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cashbook_checkout::{Checkout, CheckoutError, Payment};
use cashbook_core::{Aggregate, AggregateRoot, CashbookId, DomainError, PaymentId};
use cashbook_events::Event;

/// Aggregate root: Cashbook (one trip's shared expenses).
#[derive(Debug, Clone, PartialEq)]
pub struct Cashbook {
    id: CashbookId,
    trip_name: String,
    created_at: Option<DateTime<Utc>>,
    participants: Vec<String>,
    payments: Vec<Payment>,
    version: u64,
    created: bool,
}

impl Cashbook {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: CashbookId) -> Self {
        Self {
            id,
            trip_name: String::new(),
            created_at: None,
            participants: Vec::new(),
            payments: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> CashbookId {
        self.id
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn trip_name(&self) -> &str {
        &self.trip_name
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Participant names in the order they joined.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Payments in the order they were recorded.
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn total_cost(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Fair share per participant; `None` while nobody has joined.
    pub fn individual_cost(&self) -> Option<f64> {
        if self.participants.is_empty() {
            None
        } else {
            Some(self.total_cost() / self.participants.len() as f64)
        }
    }

    /// Settle the cashbook as it stands now.
    pub fn checkout(&self) -> Result<CashbookCheckout, CheckoutError> {
        tracing::info!(cashbook_id = %self.id, "performing checkout");
        let checkout = cashbook_checkout::settle(&self.participants, &self.payments)?;

        Ok(CashbookCheckout {
            cashbook_id: self.id,
            trip_name: self.trip_name.clone(),
            payments: self.payments.clone(),
            checkout,
        })
    }
}

impl AggregateRoot for Cashbook {
    type Id = CashbookId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Checkout of a cashbook, bundled with what the trip overview shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashbookCheckout {
    pub cashbook_id: CashbookId,
    pub trip_name: String,
    pub payments: Vec<Payment>,
    pub checkout: Checkout,
}

/// Command: CreateCashbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCashbook {
    pub cashbook_id: CashbookId,
    pub trip_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddParticipant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddParticipant {
    pub cashbook_id: CashbookId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordPayment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayment {
    pub cashbook_id: CashbookId,
    pub payment_id: PaymentId,
    pub amount: f64,
    pub description: String,
    pub payer: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CashbookCommand {
    CreateCashbook(CreateCashbook),
    AddParticipant(AddParticipant),
    RecordPayment(RecordPayment),
}

impl CashbookCommand {
    pub fn cashbook_id(&self) -> CashbookId {
        match self {
            CashbookCommand::CreateCashbook(c) => c.cashbook_id,
            CashbookCommand::AddParticipant(c) => c.cashbook_id,
            CashbookCommand::RecordPayment(c) => c.cashbook_id,
        }
    }
}

/// Event: CashbookCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashbookCreated {
    pub cashbook_id: CashbookId,
    pub trip_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAdded {
    pub cashbook_id: CashbookId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentRecorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub cashbook_id: CashbookId,
    pub payment: Payment,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CashbookEvent {
    CashbookCreated(CashbookCreated),
    ParticipantAdded(ParticipantAdded),
    PaymentRecorded(PaymentRecorded),
}

impl Event for CashbookEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CashbookEvent::CashbookCreated(_) => "cashbook.created",
            CashbookEvent::ParticipantAdded(_) => "cashbook.participant_added",
            CashbookEvent::PaymentRecorded(_) => "cashbook.payment_recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CashbookEvent::CashbookCreated(e) => e.occurred_at,
            CashbookEvent::ParticipantAdded(e) => e.occurred_at,
            CashbookEvent::PaymentRecorded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cashbook {
    type Command = CashbookCommand;
    type Event = CashbookEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CashbookEvent::CashbookCreated(e) => {
                self.id = e.cashbook_id;
                self.trip_name = e.trip_name.clone();
                self.created_at = Some(e.occurred_at);
                self.created = true;
            }
            CashbookEvent::ParticipantAdded(e) => {
                self.participants.push(e.name.clone());
            }
            CashbookEvent::PaymentRecorded(e) => {
                self.payments.push(e.payment.clone());
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if command.cashbook_id() != self.id {
            return Err(DomainError::invariant("command targets a different cashbook"));
        }

        match command {
            CashbookCommand::CreateCashbook(cmd) => self.handle_create(cmd),
            CashbookCommand::AddParticipant(cmd) => self.handle_add_participant(cmd),
            CashbookCommand::RecordPayment(cmd) => self.handle_record_payment(cmd),
        }
    }
}

impl Cashbook {
    fn ensure_created(&self) -> Result<(), DomainError> {
        if self.created {
            Ok(())
        } else {
            Err(DomainError::not_found())
        }
    }

    fn handle_create(&self, cmd: &CreateCashbook) -> Result<Vec<CashbookEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("cashbook already exists"));
        }

        let trip_name = cmd.trip_name.trim();
        if trip_name.is_empty() {
            return Err(DomainError::validation("trip name must not be empty"));
        }

        Ok(vec![CashbookEvent::CashbookCreated(CashbookCreated {
            cashbook_id: cmd.cashbook_id,
            trip_name: trip_name.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_participant(
        &self,
        cmd: &AddParticipant,
    ) -> Result<Vec<CashbookEvent>, DomainError> {
        self.ensure_created()?;

        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("participant name must not be empty"));
        }
        // Checkout identifies participants by name.
        if self.participants.iter().any(|p| p == name) {
            return Err(DomainError::conflict(format!(
                "participant '{name}' already exists"
            )));
        }

        Ok(vec![CashbookEvent::ParticipantAdded(ParticipantAdded {
            cashbook_id: cmd.cashbook_id,
            name: name.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_payment(
        &self,
        cmd: &RecordPayment,
    ) -> Result<Vec<CashbookEvent>, DomainError> {
        self.ensure_created()?;

        if !cmd.amount.is_finite() || cmd.amount < 0.0 {
            return Err(DomainError::validation("amount must be a non-negative number"));
        }
        if !(self.total_cost() + cmd.amount).is_finite() {
            return Err(DomainError::validation(
                "amount would make the total cost of the cashbook overflow",
            ));
        }

        let payer = cmd.payer.trim();
        if !self.participants.iter().any(|p| p == payer) {
            return Err(DomainError::unknown_participant(payer));
        }

        if self.payments.iter().any(|p| p.id == cmd.payment_id) {
            return Err(DomainError::conflict("payment already recorded"));
        }

        Ok(vec![CashbookEvent::PaymentRecorded(PaymentRecorded {
            cashbook_id: cmd.cashbook_id,
            payment: Payment::new(cmd.payment_id, cmd.amount, cmd.description.trim(), payer),
            occurred_at: cmd.occurred_at,
        })])
    }
}
