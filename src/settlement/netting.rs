use crate::core::balance::BalanceSheet;
use crate::core::participant::ParticipantId;
use crate::core::record::{Amount, DebtRecord};
use crate::core::transfer::Transfer;
use crate::graph::adjacency::DebtGraph;
use crate::graph::components::{find_components, Component};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use thiserror::Error;

/// Errors arising from the settlement computation itself.
///
/// Conservation holds for any input that passed record validation, so
/// these indicate an internal calculation bug rather than bad user data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NettingError {
    #[error("component pools do not conserve value (imbalance {imbalance})")]
    ConservationViolated { imbalance: Amount },
}

/// Result of one full netting run over a record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResult {
    transfers: Vec<Transfer>,
    /// Gross total of all input records.
    gross_total: Amount,
    /// Total that actually moves after netting (sum of transfer amounts).
    net_total: Amount,
    /// Number of independent settlement groups.
    component_count: usize,
}

impl SettlementResult {
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn into_transfers(self) -> Vec<Transfer> {
        self.transfers
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    pub fn gross_total(&self) -> Amount {
        self.gross_total
    }

    pub fn net_total(&self) -> Amount {
        self.net_total
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Absolute settlement volume saved by netting.
    pub fn savings(&self) -> Amount {
        self.gross_total - self.net_total
    }

    /// Savings as a percentage of gross.
    pub fn savings_percent(&self) -> f64 {
        if self.gross_total == 0 {
            return 0.0;
        }
        self.savings() as f64 * 100.0 / self.gross_total as f64
    }
}

impl std::fmt::Display for SettlementResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Result ===")?;
        writeln!(f, "Gross Total: {}", self.gross_total)?;
        writeln!(f, "Net Total:   {}", self.net_total)?;
        writeln!(f, "Savings:     {} ({:.1}%)", self.savings(), self.savings_percent())?;
        writeln!(f, "Groups:      {}", self.component_count)?;
        writeln!(f, "Transfers:   {}", self.transfers.len())?;
        for transfer in &self.transfers {
            writeln!(f, "  {}", transfer)?;
        }
        Ok(())
    }
}

/// Entry in the greedy phase's priority queues.
///
/// Ordered by amount, with ties broken toward the lexicographically
/// smaller participant id, so heap pops are fully deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PoolEntry {
    amount: Amount,
    participant: ParticipantId,
}

impl Ord for PoolEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount
            .cmp(&other.amount)
            .then_with(|| other.participant.cmp(&self.participant))
    }
}

impl PartialOrd for PoolEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The core netting engine.
///
/// Settles each connected component of the debt graph independently
/// with a two-phase heuristic:
///
/// 1. **Exact match** — payer/receiver pairs with identical outstanding
///    amounts collapse into a single transfer. A fast path only; Phase 2
///    would produce the same pairing for equal top-of-heap amounts.
/// 2. **Greedy largest-first** — repeatedly match the largest remaining
///    payable against the largest remaining receivable and transfer the
///    smaller of the two, pushing any remainder back.
///
/// The heuristic produces few transfers in practice but carries no
/// proven minimality guarantee.
pub struct NettingEngine;

impl NettingEngine {
    /// Run the full pipeline: adjacency, components, balances, then one
    /// settlement per component. Transfers are concatenated in component
    /// discovery order.
    pub fn settle_records(records: &[DebtRecord]) -> Result<SettlementResult, NettingError> {
        let graph = DebtGraph::from_records(records);
        let components = find_components(&graph);
        let balances = BalanceSheet::from_records(records);

        let mut transfers = Vec::new();
        for component in &components {
            transfers.extend(Self::settle_component(component, &balances)?);
        }

        Ok(SettlementResult {
            gross_total: records.iter().map(|r| r.amount()).sum(),
            net_total: transfers.iter().map(|t| t.amount).sum(),
            component_count: components.len(),
            transfers,
        })
    }

    /// Settle a single component against the shared balance sheet.
    ///
    /// The payable/receivable pools are locally owned working copies
    /// restricted to this component's members; nothing outside the
    /// component is read or written.
    pub fn settle_component(
        component: &Component,
        balances: &BalanceSheet,
    ) -> Result<Vec<Transfer>, NettingError> {
        let mut receivables: BTreeMap<ParticipantId, Amount> = BTreeMap::new();
        let mut payables: BTreeMap<ParticipantId, Amount> = BTreeMap::new();

        for member in component.members() {
            let position = balances.position(member);
            match position.cmp(&0) {
                Ordering::Greater => {
                    receivables.insert(member.clone(), position);
                }
                Ordering::Less => {
                    payables.insert(member.clone(), -position);
                }
                // Settled members take no part in any transfer
                Ordering::Equal => {}
            }
        }

        let owed: Amount = receivables.values().sum();
        let due: Amount = payables.values().sum();
        if owed != due {
            return Err(NettingError::ConservationViolated {
                imbalance: due - owed,
            });
        }

        let mut transfers = Vec::new();

        // Phase 1: exact 1:1 matches. Payers are visited in id order and
        // matched to the first equal-amount receiver in id order.
        let payers: Vec<ParticipantId> = payables.keys().cloned().collect();
        for payer in payers {
            let amount = payables[&payer];
            let matched = receivables
                .iter()
                .find(|(_, outstanding)| **outstanding == amount)
                .map(|(receiver, _)| receiver.clone());
            if let Some(receiver) = matched {
                receivables.remove(&receiver);
                payables.remove(&payer);
                transfers.push(Transfer::new(payer, receiver, amount));
            }
        }

        // Phase 2: greedy largest-first over the remainders.
        let mut payer_heap: BinaryHeap<PoolEntry> = payables
            .into_iter()
            .map(|(participant, amount)| PoolEntry {
                amount,
                participant,
            })
            .collect();
        let mut receiver_heap: BinaryHeap<PoolEntry> = receivables
            .into_iter()
            .map(|(participant, amount)| PoolEntry {
                amount,
                participant,
            })
            .collect();

        loop {
            let (payer, receiver) = match (payer_heap.pop(), receiver_heap.pop()) {
                (Some(payer), Some(receiver)) => (payer, receiver),
                (Some(payer), None) => {
                    payer_heap.push(payer);
                    break;
                }
                (None, Some(receiver)) => {
                    receiver_heap.push(receiver);
                    break;
                }
                (None, None) => break,
            };

            let amount = payer.amount.min(receiver.amount);
            transfers.push(Transfer::new(
                payer.participant.clone(),
                receiver.participant.clone(),
                amount,
            ));

            if payer.amount > amount {
                payer_heap.push(PoolEntry {
                    amount: payer.amount - amount,
                    participant: payer.participant,
                });
            }
            if receiver.amount > amount {
                receiver_heap.push(PoolEntry {
                    amount: receiver.amount - amount,
                    participant: receiver.participant,
                });
            }
        }

        // Conservation guarantees both heaps drain together; a one-sided
        // leftover means the balance computation upstream is broken.
        let leftover: Amount = payer_heap.iter().map(|e| e.amount).sum::<Amount>()
            - receiver_heap.iter().map(|e| e.amount).sum::<Amount>();
        if leftover != 0 {
            return Err(NettingError::ConservationViolated {
                imbalance: leftover,
            });
        }

        Ok(transfers)
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

    fn transfer(payer: &str, receiver: &str, amount: Amount) -> Transfer {
        Transfer::new(ParticipantId::new(payer), ParticipantId::new(receiver), amount)
    }

    fn sorted(mut transfers: Vec<Transfer>) -> Vec<Transfer> {
        transfers.sort();
        transfers
    }

    #[test]
    fn test_exact_match_single_pair() {
        let result = NettingEngine::settle_records(&[record("Michał", "Kamil", 13)]).unwrap();
        assert_eq!(result.transfers(), &[transfer("Kamil", "Michał", 13)]);
    }

    #[test]
    fn test_split_across_receivers() {
        // Dominik owes 10 total; Jacek and Kasia are each owed 5.
        let result = NettingEngine::settle_records(&[
            record("Jacek", "Dominik", 10),
            record("Dominik", "Jacek", 5),
            record("Kasia", "Dominik", 5),
        ])
        .unwrap();
        assert_eq!(
            sorted(result.into_transfers()),
            vec![transfer("Dominik", "Jacek", 5), transfer("Dominik", "Kasia", 5)]
        );
    }

    #[test]
    fn test_greedy_prefers_largest_pair() {
        // Payables: X 100, Y 30. Receivables: P 80, Q 50.
        let result = NettingEngine::settle_records(&[
            record("P", "X", 80),
            record("Q", "X", 20),
            record("Q", "Y", 30),
        ])
        .unwrap();
        // Largest payer X (100) meets largest receiver P (80) first.
        assert_eq!(
            result.transfers(),
            &[
                transfer("X", "P", 80),
                transfer("Y", "Q", 30),
                transfer("X", "Q", 20),
            ]
        );
    }

    #[test]
    fn test_heap_ties_break_by_id() {
        // Two receivers owed the same amount by one payer owing double.
        let result = NettingEngine::settle_records(&[
            record("Beata", "Marek", 50),
            record("Adam", "Marek", 50),
        ])
        .unwrap();
        // Phase 1 finds no exact match (Marek owes 100); Phase 2 must
        // pick Adam before Beata on the amount tie.
        assert_eq!(
            result.transfers(),
            &[transfer("Marek", "Adam", 50), transfer("Marek", "Beata", 50)]
        );
    }

    #[test]
    fn test_perfect_cycle_needs_no_transfers() {
        let result = NettingEngine::settle_records(&[
            record("B", "A", 100),
            record("C", "B", 100),
            record("A", "C", 100),
        ])
        .unwrap();
        assert!(result.transfers().is_empty());
        assert_eq!(result.gross_total(), 300);
        assert_eq!(result.net_total(), 0);
        assert_eq!(result.savings(), 300);
    }

    #[test]
    fn test_empty_records() {
        let result = NettingEngine::settle_records(&[]).unwrap();
        assert!(result.transfers().is_empty());
        assert_eq!(result.gross_total(), 0);
        assert_eq!(result.component_count(), 0);
        assert_eq!(result.savings_percent(), 0.0);
    }

    #[test]
    fn test_components_settle_independently() {
        let result = NettingEngine::settle_records(&[
            record("A", "B", 10),
            record("C", "D", 7),
        ])
        .unwrap();
        assert_eq!(result.component_count(), 2);
        assert_eq!(
            sorted(result.into_transfers()),
            vec![transfer("B", "A", 10), transfer("D", "C", 7)]
        );
    }

    #[test]
    fn test_settled_member_excluded() {
        // B both owes and is owed 10: net zero, never appears in output.
        let result = NettingEngine::settle_records(&[
            record("A", "B", 10),
            record("B", "C", 10),
        ])
        .unwrap();
        assert_eq!(result.transfers(), &[transfer("C", "A", 10)]);
    }

    #[test]
    fn test_imbalanced_pools_rejected() {
        // Hand-built balances that violate conservation for the component.
        let balances = BalanceSheet::from_records(&[record("A", "B", 10), record("A", "C", 5)]);
        let graph = DebtGraph::from_records(&[record("A", "B", 10)]);
        let component = &find_components(&graph)[0];
        // Component {A, B} sees A +15 but B only -10.
        let err = NettingEngine::settle_component(component, &balances).unwrap_err();
        assert_eq!(err, NettingError::ConservationViolated { imbalance: -5 });
    }
}
