use crate::core::participant::ParticipantId;
use crate::core::record::DebtRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Undirected adjacency relation between participants.
///
/// Each record links its creditor and debtor both ways; the direction
/// of the debt is irrelevant for grouping, only the fact that the two
/// participants belong to the same settlement cluster.
///
/// Adjacency is stored in `BTreeMap`/`BTreeSet`, so participant and
/// neighbour iteration always follows id order. This makes component
/// discovery deterministic for any input order.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::participant::ParticipantId;
/// use settlement_engine::core::record::DebtRecord;
/// use settlement_engine::graph::adjacency::DebtGraph;
///
/// let records = vec![
///     DebtRecord::new(ParticipantId::new("A"), ParticipantId::new("B"), 100).unwrap(),
///     DebtRecord::new(ParticipantId::new("B"), ParticipantId::new("C"), 50).unwrap(),
/// ];
/// let graph = DebtGraph::from_records(&records);
/// assert_eq!(graph.participant_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DebtGraph {
    adjacency: BTreeMap<ParticipantId, BTreeSet<ParticipantId>>,
}

impl DebtGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the adjacency relation from a sequence of records. O(n log n).
    pub fn from_records(records: &[DebtRecord]) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.add_record(record);
        }
        graph
    }

    /// Link creditor and debtor in both directions (deduplicated).
    pub fn add_record(&mut self, record: &DebtRecord) {
        self.adjacency
            .entry(record.creditor().clone())
            .or_default()
            .insert(record.debtor().clone());
        self.adjacency
            .entry(record.debtor().clone())
            .or_default()
            .insert(record.creditor().clone());
    }

    /// Number of unique participants in the graph.
    pub fn participant_count(&self) -> usize {
        self.adjacency.len()
    }

    /// All participants, in id order.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.adjacency.keys()
    }

    /// Neighbours of one participant, if present.
    pub fn neighbours(&self, participant: &ParticipantId) -> Option<&BTreeSet<ParticipantId>> {
        self.adjacency.get(participant)
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
