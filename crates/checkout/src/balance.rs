use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::CheckoutError;
use crate::model::{Checkout, Participant, Payment, Transaction};

/// Contributions per participant plus the derived costs.
///
/// Participants live in one flat arena (input order); `index` maps a name to
/// its slot. Later stages refer to participants by slot only.
#[derive(Debug, Clone)]
pub struct BalanceSheet {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
    total_cost: f64,
    individual_cost: f64,
}

impl BalanceSheet {
    /// Sum `payments` per payer and split the total evenly.
    ///
    /// Fails on an empty or duplicated participant list, on a payer that is
    /// not a participant, on negative or non-finite amounts, and when the
    /// amounts overflow once summed.
    pub fn compute<S: AsRef<str>>(
        names: &[S],
        payments: &[Payment],
    ) -> Result<Self, CheckoutError> {
        if names.is_empty() {
            return Err(CheckoutError::EmptyParticipants);
        }

        let mut participants = Vec::with_capacity(names.len());
        let mut index = HashMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match index.entry(name.to_string()) {
                Entry::Occupied(_) => {
                    return Err(CheckoutError::DuplicateParticipant(name.to_string()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(participants.len());
                    participants.push(Participant::new(name));
                }
            }
        }

        let mut total_cost = 0.0;
        for payment in payments {
            if !payment.amount.is_finite() || payment.amount < 0.0 {
                return Err(CheckoutError::InvalidAmount {
                    payment_id: payment.id,
                    amount: payment.amount,
                });
            }
            let slot = *index
                .get(payment.payer.as_str())
                .ok_or_else(|| CheckoutError::UnknownPayer {
                    payment_id: payment.id,
                    payer: payment.payer.clone(),
                })?;
            participants[slot].add_contribution(payment.amount);
            total_cost += payment.amount;
        }

        // Contributions never exceed the total, so a finite total keeps
        // every balance finite.
        if !total_cost.is_finite() {
            return Err(CheckoutError::NonFiniteTotal { total: total_cost });
        }
        let individual_cost = total_cost / participants.len() as f64;

        Ok(Self {
            participants,
            index,
            total_cost,
            individual_cost,
        })
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn individual_cost(&self) -> f64 {
        self.individual_cost
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.index.get(name).map(|&slot| &self.participants[slot])
    }

    pub(crate) fn participants_mut(&mut self) -> &mut [Participant] {
        &mut self.participants
    }

    pub(crate) fn into_checkout(self, transactions: Vec<Transaction>) -> Checkout {
        Checkout {
            total_cost: self.total_cost,
            individual_cost: self.individual_cost,
            participants: self.participants,
            transactions,
        }
    }
}
