use cashbook_core::PaymentId;
use thiserror::Error;

/// Why a checkout could not be computed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckoutError {
    /// No participants: the individual cost would be a division by zero.
    #[error("invalid input: a checkout needs at least one participant")]
    EmptyParticipants,

    #[error("invalid input: participant '{0}' is listed more than once")]
    DuplicateParticipant(String),

    /// A payment names a payer that is not a participant.
    #[error("payment {payment_id} was made by '{payer}', who is not a participant")]
    UnknownPayer { payment_id: PaymentId, payer: String },

    #[error("payment {payment_id} has invalid amount {amount}")]
    InvalidAmount { payment_id: PaymentId, amount: f64 },

    /// Each payment is finite but their sum is not.
    #[error("payments add up to {total}, which cannot be split")]
    NonFiniteTotal { total: f64 },
}

impl CheckoutError {
    /// True for errors caused by the participant list itself.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CheckoutError::EmptyParticipants | CheckoutError::DuplicateParticipant(_)
        )
    }
}
