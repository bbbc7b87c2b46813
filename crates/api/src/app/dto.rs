use serde::Deserialize;
use serde_json::{Value, json};

use cashbook_checkout::{Participant, Payment, Transaction};
use cashbook_ledger::{Cashbook, CashbookCheckout};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCashbookRequest {
    pub trip_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddParticipantRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub payer: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

// -------------------------
// Response mapping
// -------------------------

/// Two-decimal euro amount, rounded half away from zero to whole cents.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() / 100.0;
    // -0.004 rounds to -0.0; print it as 0.00.
    let cents = if cents == 0.0 { 0.0 } else { cents };
    format!("{cents:.2} €")
}

fn money(amount: f64) -> Value {
    json!({
        "value": amount,
        "formatted": format_currency(amount),
    })
}

pub fn payment_to_json(p: &Payment) -> Value {
    json!({
        "id": p.id.to_string(),
        "payer": p.payer,
        "amount": money(p.amount),
        "description": p.description,
    })
}

pub fn cashbook_to_json(c: &Cashbook) -> Value {
    json!({
        "id": c.id_typed().to_string(),
        "trip_name": c.trip_name(),
        "created_at": c.created_at().map(|t| t.to_rfc3339()),
        "participants": c.participants(),
        "payments": c.payments().iter().map(payment_to_json).collect::<Vec<_>>(),
        "total_cost": money(c.total_cost()),
    })
}

pub fn participants_to_json(c: &Cashbook) -> Value {
    json!({ "items": c.participants() })
}

pub fn costs_to_json(c: &Cashbook) -> Value {
    json!({
        "id": c.id_typed().to_string(),
        "trip_name": c.trip_name(),
        "payments": c.payments().iter().map(payment_to_json).collect::<Vec<_>>(),
        "total_cost": money(c.total_cost()),
        "individual_cost": c.individual_cost().map(money),
    })
}

fn participant_to_json(p: &Participant) -> Value {
    json!({
        "name": p.name(),
        "contribution": money(p.contribution()),
        "surplus": money(p.original_surplus()),
        "deficit": money(p.original_deficit()),
        "remaining_surplus": money(p.surplus()),
        "remaining_deficit": money(p.deficit()),
    })
}

fn transaction_to_json(t: &Transaction) -> Value {
    json!({
        "from": t.from,
        "to": t.to,
        "amount": money(t.amount),
    })
}

pub fn checkout_to_json(c: &CashbookCheckout) -> Value {
    json!({
        "cashbook_id": c.cashbook_id.to_string(),
        "trip_name": c.trip_name,
        "payments": c.payments.iter().map(payment_to_json).collect::<Vec<_>>(),
        "total_cost": money(c.checkout.total_cost),
        "individual_cost": money(c.checkout.individual_cost),
        "participants": c.checkout.participants.iter().map(participant_to_json).collect::<Vec<_>>(),
        "transactions": c.checkout.transactions.iter().map(transaction_to_json).collect::<Vec<_>>(),
    })
}
