use crate::core::participant::ParticipantId;
use crate::core::record::{Amount, DebtRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net signed position of every participant after applying all records.
///
/// A positive balance means the participant is owed money (net receivable).
/// A negative balance means the participant owes money (net payable).
/// A zero balance means the participant is settled and is excluded from
/// all further processing.
///
/// Positions are keyed by participant id in a `BTreeMap`, so iteration
/// order is always participant-id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    positions: BTreeMap<ParticipantId, Amount>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute net balances from raw records in a single pass.
    pub fn from_records(records: &[DebtRecord]) -> Self {
        let mut sheet = Self::new();
        for record in records {
            sheet.apply_record(record);
        }
        sheet
    }

    /// Apply one record: creditor gains, debtor loses.
    pub fn apply_record(&mut self, record: &DebtRecord) {
        *self.positions.entry(record.creditor().clone()).or_insert(0) += record.amount();
        *self.positions.entry(record.debtor().clone()).or_insert(0) -= record.amount();
    }

    /// Net position of one participant (zero if unknown).
    pub fn position(&self, participant: &ParticipantId) -> Amount {
        self.positions.get(participant).copied().unwrap_or(0)
    }

    /// All positions, including settled (zero) ones.
    pub fn positions(&self) -> &BTreeMap<ParticipantId, Amount> {
        &self.positions
    }

    /// Verify conservation: every credit has a matching debit, so the
    /// sum of all positions is exactly zero.
    pub fn is_balanced(&self) -> bool {
        self.positions.values().sum::<Amount>() == 0
    }

    /// Total amount that actually has to move: the sum of positive
    /// positions (equal to the sum of |negative| positions).
    pub fn total_net_settlement(&self) -> Amount {
        self.positions.values().filter(|v| **v > 0).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(creditor: &str, debtor: &str, amount: Amount) -> DebtRecord {
        DebtRecord::new(
            ParticipantId::new(creditor),
            ParticipantId::new(debtor),
            amount,
        )
        .unwrap()
    }

    #[test]
    fn test_balance_basic() {
        let sheet = BalanceSheet::from_records(&[record("B", "A", 100)]);
        assert_eq!(sheet.position(&ParticipantId::new("A")), -100);
        assert_eq!(sheet.position(&ParticipantId::new("B")), 100);
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_balance_nets_mutual_debts() {
        let sheet = BalanceSheet::from_records(&[
            record("B", "A", 100),
            record("A", "B", 60),
        ]);
        assert_eq!(sheet.position(&ParticipantId::new("A")), -40);
        assert_eq!(sheet.position(&ParticipantId::new("B")), 40);
        assert_eq!(sheet.total_net_settlement(), 40);
    }

    #[test]
    fn test_balance_circular_cancels() {
        let sheet = BalanceSheet::from_records(&[
            record("B", "A", 100),
            record("C", "B", 100),
            record("A", "C", 100),
        ]);
        // Perfect cycle: everyone's net position is zero
        assert_eq!(sheet.position(&ParticipantId::new("A")), 0);
        assert_eq!(sheet.total_net_settlement(), 0);
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_balance_unknown_participant() {
        let sheet = BalanceSheet::new();
        assert_eq!(sheet.position(&ParticipantId::new("nobody")), 0);
    }
}
