use serde::{Deserialize, Serialize};

use cashbook_core::PaymentId;

/// A recorded expense: `payer` paid `amount` for the whole group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Non-negative amount in currency units (two decimals expected).
    pub amount: f64,
    pub description: String,
    pub payer: String,
}

impl Payment {
    pub fn new(
        id: PaymentId,
        amount: f64,
        description: impl Into<String>,
        payer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            amount,
            description: description.into(),
            payer: payer.into(),
        }
    }
}

/// Per-participant balance record for one checkout run.
///
/// At most one of `surplus` / `deficit` is non-zero. The `original_*`
/// amounts are fixed at classification time; the plain ones count down to
/// zero while transactions are matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    name: String,
    contribution: f64,
    surplus: f64,
    deficit: f64,
    original_surplus: f64,
    original_deficit: f64,
}

impl Participant {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contribution: 0.0,
            surplus: 0.0,
            deficit: 0.0,
            original_surplus: 0.0,
            original_deficit: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sum of all payments made by this participant.
    pub fn contribution(&self) -> f64 {
        self.contribution
    }

    /// Amount still owed *to* this participant.
    pub fn surplus(&self) -> f64 {
        self.surplus
    }

    /// Amount this participant still owes.
    pub fn deficit(&self) -> f64 {
        self.deficit
    }

    pub fn original_surplus(&self) -> f64 {
        self.original_surplus
    }

    pub fn original_deficit(&self) -> f64 {
        self.original_deficit
    }

    pub fn is_creditor(&self) -> bool {
        self.original_surplus > 0.0
    }

    pub(crate) fn add_contribution(&mut self, amount: f64) {
        self.contribution += amount;
    }

    pub(crate) fn open_surplus(&mut self, amount: f64) {
        self.surplus = amount;
        self.original_surplus = amount;
    }

    pub(crate) fn open_deficit(&mut self, amount: f64) {
        self.deficit = amount;
        self.original_deficit = amount;
    }

    pub(crate) fn set_surplus(&mut self, amount: f64) {
        self.surplus = amount;
    }

    pub(crate) fn set_deficit(&mut self, amount: f64) {
        self.deficit = amount;
    }
}

/// `from` pays `to` exactly `amount` (always > 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Result of settling a cashbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkout {
    pub total_cost: f64,
    /// Fair share per participant (`total_cost / participants`).
    pub individual_cost: f64,
    /// Participants in the order they were supplied.
    pub participants: Vec<Participant>,
    /// Transfers in emission order.
    pub transactions: Vec<Transaction>,
}

impl Checkout {
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }
}
