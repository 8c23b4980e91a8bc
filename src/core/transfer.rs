use crate::core::participant::ParticipantId;
use crate::core::record::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One settlement instruction: `payer` sends `receiver` a positive `amount`.
///
/// Transfers are the output unit of the netting engine. A participant
/// may appear as payer or receiver in more than one transfer: a large
/// payable can be split across several receivers, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transfer {
    pub payer: ParticipantId,
    pub receiver: ParticipantId,
    pub amount: Amount,
}

impl Transfer {
    pub fn new(payer: ParticipantId, receiver: ParticipantId, amount: Amount) -> Self {
        Self {
            payer,
            receiver,
            amount,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.payer, self.receiver, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_display() {
        let t = Transfer::new(ParticipantId::new("Kamil"), ParticipantId::new("Michał"), 13);
        assert_eq!(format!("{}", t), "Kamil -> Michał: 13");
    }
}
