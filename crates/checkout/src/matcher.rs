use crate::EPSILON;
use crate::classify::Classification;
use crate::model::{Participant, Transaction};

/// Where the matcher is in its sweep.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchState {
    Advancing,
    /// Every creditor has been paid; terminal.
    CreditorsExhausted,
    /// Every debtor has paid; terminal.
    DebtorsExhausted,
}

/// Greedy two-pointer settlement over a classified arena.
///
/// Each step pairs the current (largest remaining) debtor with the current
/// creditor and transfers the smaller of the two amounts, which fully
/// settles at least one side. Transactions are produced lazily through
/// [`Iterator`]; remaining amounts are written back into the arena.
#[derive(Debug)]
pub struct Matcher<'a> {
    participants: &'a mut [Participant],
    creditors: Vec<usize>,
    debtors: Vec<usize>,
    creditor: usize,
    debtor: usize,
    state: MatchState,
}

impl<'a> Matcher<'a> {
    pub fn new(participants: &'a mut [Participant], classification: Classification) -> Self {
        let (creditors, debtors) = classification.into_parts();
        let state = if creditors.is_empty() {
            MatchState::CreditorsExhausted
        } else if debtors.is_empty() {
            MatchState::DebtorsExhausted
        } else {
            MatchState::Advancing
        };

        Self {
            participants,
            creditors,
            debtors,
            creditor: 0,
            debtor: 0,
            state,
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    fn advance_creditor(&mut self) {
        self.creditor += 1;
        if self.creditor == self.creditors.len() && self.state == MatchState::Advancing {
            self.state = MatchState::CreditorsExhausted;
        }
    }

    fn advance_debtor(&mut self) {
        self.debtor += 1;
        if self.debtor == self.debtors.len() && self.state == MatchState::Advancing {
            self.state = MatchState::DebtorsExhausted;
        }
    }

    fn transaction(&self, debtor: usize, creditor: usize, amount: f64) -> Transaction {
        Transaction {
            from: self.participants[debtor].name().to_string(),
            to: self.participants[creditor].name().to_string(),
            amount,
        }
    }
}

impl Iterator for Matcher<'_> {
    type Item = Transaction;

    fn next(&mut self) -> Option<Transaction> {
        while self.state == MatchState::Advancing {
            let creditor = self.creditors[self.creditor];
            let debtor = self.debtors[self.debtor];
            let surplus = self.participants[creditor].surplus();
            let deficit = self.participants[debtor].deficit();

            // Inert entries (even participants) never appear in a transfer.
            if surplus <= EPSILON {
                self.participants[creditor].set_surplus(0.0);
                self.advance_creditor();
                continue;
            }
            if deficit <= EPSILON {
                self.participants[debtor].set_deficit(0.0);
                self.advance_debtor();
                continue;
            }

            let transaction = if (deficit - surplus).abs() <= EPSILON {
                self.participants[debtor].set_deficit(0.0);
                self.participants[creditor].set_surplus(0.0);
                let transaction = self.transaction(debtor, creditor, deficit);
                self.advance_creditor();
                self.advance_debtor();
                transaction
            } else if deficit > surplus {
                self.participants[debtor].set_deficit(deficit - surplus);
                self.participants[creditor].set_surplus(0.0);
                let transaction = self.transaction(debtor, creditor, surplus);
                self.advance_creditor();
                transaction
            } else {
                self.participants[creditor].set_surplus(surplus - deficit);
                self.participants[debtor].set_deficit(0.0);
                let transaction = self.transaction(debtor, creditor, deficit);
                self.advance_debtor();
                transaction
            };
            return Some(transaction);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceSheet;
    use crate::model::Payment;
    use cashbook_core::PaymentId;

    fn classified(names: &[&str], paid: &[(&str, f64)]) -> (BalanceSheet, Classification) {
        let payments: Vec<Payment> = paid
            .iter()
            .map(|&(payer, amount)| Payment::new(PaymentId::new(), amount, "", payer))
            .collect();
        let mut sheet = BalanceSheet::compute(names, &payments).unwrap();
        let classes = Classification::of(&mut sheet);
        (sheet, classes)
    }

    #[test]
    fn nothing_to_match_when_everyone_is_even() {
        let (mut sheet, classes) = classified(&["A", "B"], &[("A", 5.0), ("B", 5.0)]);
        let mut matcher = Matcher::new(sheet.participants_mut(), classes);

        assert_eq!(matcher.state(), MatchState::CreditorsExhausted);
        assert_eq!(matcher.next(), None);
    }

    #[test]
    fn debtor_larger_than_creditor_moves_to_next_creditor() {
        // share 40: A +20, B +20, C -40
        let (mut sheet, classes) =
            classified(&["A", "B", "C"], &[("A", 60.0), ("B", 60.0)]);
        let transactions: Vec<Transaction> =
            Matcher::new(sheet.participants_mut(), classes).collect();

        assert_eq!(
            transactions,
            vec![
                Transaction { from: "C".into(), to: "B".into(), amount: 20.0 },
                Transaction { from: "C".into(), to: "A".into(), amount: 20.0 },
            ]
        );
    }

    #[test]
    fn sweep_stops_once_both_sides_are_settled() {
        let (mut sheet, classes) = classified(&["A", "B"], &[("A", 100.0)]);
        let mut matcher = Matcher::new(sheet.participants_mut(), classes);

        assert_eq!(matcher.state(), MatchState::Advancing);
        let first = matcher.next().unwrap();
        assert_eq!(first.amount, 50.0);
        assert_eq!(matcher.state(), MatchState::CreditorsExhausted);
        assert_eq!(matcher.next(), None);
        assert_eq!(matcher.next(), None);
    }

    #[test]
    fn leftover_debtors_are_tolerated_after_creditors_run_out() {
        let (mut sheet, _) = classified(&["A", "B", "C"], &[("A", 30.0)]);
        // Hand-built lopsided lists: one creditor owed 5, two debtors owing 10.
        sheet.participants_mut()[0].open_surplus(5.0);
        sheet.participants_mut()[1].open_deficit(10.0);
        sheet.participants_mut()[2].open_deficit(10.0);
        let classes = Classification::from_parts(vec![0], vec![2, 1]);

        let mut matcher = Matcher::new(sheet.participants_mut(), classes);
        let transactions: Vec<Transaction> = matcher.by_ref().collect();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 5.0);
        assert_eq!(matcher.state(), MatchState::CreditorsExhausted);
        assert_eq!(sheet.participants()[2].deficit(), 5.0);
        assert_eq!(sheet.participants()[1].deficit(), 10.0);
    }

    #[test]
    fn single_sided_lists_produce_nothing() {
        let (mut sheet, _) = classified(&["A"], &[]);
        sheet.participants_mut()[0].open_surplus(10.0);
        let classes = Classification::from_parts(vec![0], vec![]);

        let mut matcher = Matcher::new(sheet.participants_mut(), classes);
        assert_eq!(matcher.state(), MatchState::DebtorsExhausted);
        assert_eq!(matcher.next(), None);
    }
}
