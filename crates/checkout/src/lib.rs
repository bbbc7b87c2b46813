//! Checkout: settling a cashbook with the fewest peer-to-peer transfers.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.
//!
//! The computation runs in three stages over one owned arena of
//! [`Participant`] records:
//!
//! 1. [`BalanceSheet`] sums each participant's payments and derives the
//!    total and individual (fair-share) cost.
//! 2. [`Classification`] splits participants into creditors and debtors,
//!    each sorted by amount descending, ties by name descending.
//! 3. [`Matcher`] pairs the largest creditor with the largest debtor until
//!    one side runs out, yielding [`Transaction`]s lazily.

pub mod balance;
pub mod classify;
pub mod error;
pub mod matcher;
pub mod model;

pub use balance::BalanceSheet;
pub use classify::Classification;
pub use error::CheckoutError;
pub use matcher::{MatchState, Matcher};
pub use model::{Checkout, Participant, Payment, Transaction};

/// Tolerance for monetary comparisons on accumulated floating-point sums.
pub const EPSILON: f64 = 1e-9;

/// Settle `payments` between `participants`.
///
/// Participant order is preserved in the returned [`Checkout`]; transaction
/// order depends only on amounts and names, so identical input always yields
/// identical output.
pub fn settle<S: AsRef<str>>(
    participants: &[S],
    payments: &[Payment],
) -> Result<Checkout, CheckoutError> {
    let mut sheet = BalanceSheet::compute(participants, payments)?;
    let classification = Classification::of(&mut sheet);
    let creditors = classification.creditors().len();
    let debtors = classification.debtors().len();

    let transactions: Vec<Transaction> =
        Matcher::new(sheet.participants_mut(), classification).collect();

    tracing::debug!(
        participants = participants.len(),
        payments = payments.len(),
        creditors,
        debtors,
        transactions = transactions.len(),
        total_cost = sheet.total_cost(),
        "checkout computed"
    );

    Ok(sheet.into_checkout(transactions))
}
