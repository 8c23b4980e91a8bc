use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Monetary amount in whole units.
///
/// The engine operates on integral amounts throughout; callers working
/// in fractional currency should convert to minor units before ingestion.
pub type Amount = i64;

/// Errors arising from debt record validation at ingestion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("debt amount must be positive, got {amount} ({debtor} -> {creditor})")]
    NonPositiveAmount {
        creditor: ParticipantId,
        debtor: ParticipantId,
        amount: Amount,
    },
    #[error("self-referential debt record for {participant}")]
    SelfReferential { participant: ParticipantId },
}

/// A single raw debt fact: `debtor` owes `creditor` a positive `amount`.
///
/// Records are immutable once created. The netting engine operates on
/// collections of records to compute net positions and settlement
/// transfers.
///
/// Validation happens here, at ingestion: zero or negative amounts and
/// self-referential records are rejected rather than carried into the
/// pipeline.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::participant::ParticipantId;
/// use settlement_engine::core::record::DebtRecord;
///
/// let record = DebtRecord::new(
///     ParticipantId::new("Jacek"),
///     ParticipantId::new("Dominik"),
///     10,
/// ).unwrap();
///
/// assert_eq!(record.amount(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRecord {
    /// The party that is owed the amount.
    creditor: ParticipantId,
    /// The party that owes the amount.
    debtor: ParticipantId,
    /// The amount owed. Always positive.
    amount: Amount,
}

impl DebtRecord {
    /// Create a validated debt record.
    pub fn new(
        creditor: ParticipantId,
        debtor: ParticipantId,
        amount: Amount,
    ) -> Result<Self, RecordError> {
        if creditor == debtor {
            return Err(RecordError::SelfReferential {
                participant: creditor,
            });
        }
        if amount <= 0 {
            return Err(RecordError::NonPositiveAmount {
                creditor,
                debtor,
                amount,
            });
        }
        Ok(Self {
            creditor,
            debtor,
            amount,
        })
    }

    pub fn creditor(&self) -> &ParticipantId {
        &self.creditor
    }

    pub fn debtor(&self) -> &ParticipantId {
        &self.debtor
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// A collection of debt records submitted to one netting run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtRecordSet {
    records: Vec<DebtRecord>,
}

impl DebtRecordSet {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn add(&mut self, record: DebtRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[DebtRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total gross value of all records.
    pub fn gross_total(&self) -> Amount {
        self.records.iter().map(|r| r.amount()).sum()
    }

    /// All unique participants referenced in this set, in id order.
    pub fn participants(&self) -> Vec<ParticipantId> {
        let mut participants: Vec<ParticipantId> = self
            .records
            .iter()
            .flat_map(|r| [r.creditor().clone(), r.debtor().clone()])
            .collect();
        participants.sort();
        participants.dedup();
        participants
    }
}

impl FromIterator<DebtRecord> for DebtRecordSet {
    fn from_iter<T: IntoIterator<Item = DebtRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
