//! Cashbook ledger (event-sourced).
//!
//! A cashbook records who takes part in a trip and who paid for what.
//! Business rules only: no IO, no HTTP, no storage.

pub mod cashbook;

pub use cashbook::{
    AddParticipant, Cashbook, CashbookCheckout, CashbookCommand, CashbookCreated, CashbookEvent,
    CreateCashbook, ParticipantAdded, PaymentRecorded, RecordPayment,
};
