use std::cmp::Ordering;

use crate::EPSILON;
use crate::balance::BalanceSheet;
use crate::model::Participant;

/// Creditor and debtor slots into a [`BalanceSheet`], each in settlement order.
///
/// Both lists are sorted by amount descending with ties broken by name
/// descending, so the same input always produces the same pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    creditors: Vec<usize>,
    debtors: Vec<usize>,
}

impl Classification {
    /// Open each participant's surplus or deficit against the individual cost.
    ///
    /// A participant counts as a creditor only when they paid more than
    /// their share by more than [`EPSILON`]; everyone else is a debtor,
    /// possibly with a deficit of zero.
    pub fn of(sheet: &mut BalanceSheet) -> Self {
        let share = sheet.individual_cost();
        let participants = sheet.participants_mut();

        let mut creditors = Vec::new();
        let mut debtors = Vec::new();
        for (slot, participant) in participants.iter_mut().enumerate() {
            let balance = participant.contribution() - share;
            if balance > EPSILON {
                participant.open_surplus(balance);
                creditors.push(slot);
            } else {
                participant.open_deficit((-balance).max(0.0));
                debtors.push(slot);
            }
        }

        creditors.sort_by(|&a, &b| {
            settlement_order(
                &participants[a],
                &participants[b],
                Participant::original_surplus,
            )
        });
        debtors.sort_by(|&a, &b| {
            settlement_order(
                &participants[a],
                &participants[b],
                Participant::original_deficit,
            )
        });

        Self { creditors, debtors }
    }

    pub fn creditors(&self) -> &[usize] {
        &self.creditors
    }

    pub fn debtors(&self) -> &[usize] {
        &self.debtors
    }

    #[cfg(test)]
    pub(crate) fn from_parts(creditors: Vec<usize>, debtors: Vec<usize>) -> Self {
        Self { creditors, debtors }
    }

    pub(crate) fn into_parts(self) -> (Vec<usize>, Vec<usize>) {
        (self.creditors, self.debtors)
    }
}

fn settlement_order(a: &Participant, b: &Participant, amount: fn(&Participant) -> f64) -> Ordering {
    amount(b)
        .total_cmp(&amount(a))
        .then_with(|| b.name().cmp(a.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Payment;
    use cashbook_core::PaymentId;

    fn sheet(names: &[&str], paid: &[(&str, f64)]) -> BalanceSheet {
        let payments: Vec<Payment> = paid
            .iter()
            .map(|&(payer, amount)| Payment::new(PaymentId::new(), amount, "", payer))
            .collect();
        BalanceSheet::compute(names, &payments).unwrap()
    }

    fn names(sheet: &BalanceSheet, slots: &[usize]) -> Vec<String> {
        slots
            .iter()
            .map(|&slot| sheet.participants()[slot].name().to_string())
            .collect()
    }

    #[test]
    fn splits_on_individual_cost() {
        let mut sheet = sheet(&["A", "B", "C"], &[("A", 60.0), ("B", 30.0)]);
        let classes = Classification::of(&mut sheet);

        assert_eq!(names(&sheet, classes.creditors()), vec!["A"]);
        assert_eq!(names(&sheet, classes.debtors()), vec!["C", "B"]);
        assert_eq!(sheet.get("A").unwrap().surplus(), 30.0);
        assert_eq!(sheet.get("B").unwrap().deficit(), 0.0);
        assert_eq!(sheet.get("C").unwrap().deficit(), 30.0);
    }

    #[test]
    fn ties_break_by_name_descending() {
        let mut sheet = sheet(
            &["Anna", "Cleo", "Ben", "Dave", "Eve", "Finn"],
            &[("Anna", 100.0), ("Cleo", 100.0), ("Ben", 100.0)],
        );
        let classes = Classification::of(&mut sheet);

        assert_eq!(names(&sheet, classes.creditors()), vec!["Cleo", "Ben", "Anna"]);
        assert_eq!(names(&sheet, classes.debtors()), vec!["Finn", "Eve", "Dave"]);
    }

    #[test]
    fn larger_amounts_come_first() {
        let mut sheet = sheet(
            &["A", "B", "C", "D"],
            &[("A", 10.0), ("B", 70.0), ("C", 20.0)],
        );
        // share 25: B +45, A -15, C -5, D -25
        let classes = Classification::of(&mut sheet);

        assert_eq!(names(&sheet, classes.creditors()), vec!["B"]);
        assert_eq!(names(&sheet, classes.debtors()), vec!["D", "A", "C"]);
    }

    #[test]
    fn rounding_noise_does_not_make_creditors() {
        let mut sheet = sheet(&["A", "B", "C"], &[("A", 0.1), ("B", 0.1), ("C", 0.1)]);
        let classes = Classification::of(&mut sheet);

        assert!(classes.creditors().is_empty());
        assert!(
            sheet
                .participants()
                .iter()
                .all(|p| p.deficit() <= EPSILON && p.surplus() == 0.0)
        );
    }
}
