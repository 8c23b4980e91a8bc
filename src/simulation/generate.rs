use crate::core::participant::ParticipantId;
use crate::core::record::{Amount, DebtRecord, DebtRecordSet};
use rand::Rng;

/// Configuration for generating a random debt network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of participants in the network.
    pub participant_count: usize,
    /// Number of disjoint clusters the participants are split into.
    /// Debts never cross clusters, so the graph decomposes into at
    /// least this many components.
    pub cluster_count: usize,
    /// Average number of debt records per participant.
    pub avg_debts_per_participant: usize,
    /// Minimum debt amount.
    pub min_amount: Amount,
    /// Maximum debt amount.
    pub max_amount: Amount,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            participant_count: 10,
            cluster_count: 1,
            avg_debts_per_participant: 3,
            min_amount: 1,
            max_amount: 10_000,
        }
    }
}

/// Generate a random debt network for testing.
pub fn generate_random_network(config: &NetworkConfig) -> DebtRecordSet {
    let mut rng = rand::thread_rng();
    let mut set = DebtRecordSet::new();

    let clusters = config.cluster_count.max(1).min(config.participant_count.max(1));
    let participants: Vec<ParticipantId> = (0..config.participant_count)
        .map(|i| ParticipantId::new(format!("member-{:03}", i)))
        .collect();
    if participants.len() < 2 {
        return set;
    }

    let total_debts = config.participant_count * config.avg_debts_per_participant;

    for _ in 0..total_debts {
        // Pick a cluster, then two distinct members of it.
        let cluster = rng.gen_range(0..clusters);
        let members: Vec<&ParticipantId> = participants
            .iter()
            .enumerate()
            .filter(|(i, _)| i % clusters == cluster)
            .map(|(_, p)| p)
            .collect();
        if members.len() < 2 {
            continue;
        }

        let creditor_idx = rng.gen_range(0..members.len());
        let mut debtor_idx = rng.gen_range(0..members.len());
        while debtor_idx == creditor_idx {
            debtor_idx = rng.gen_range(0..members.len());
        }

        let amount = rng.gen_range(config.min_amount.max(1)..=config.max_amount);
        if let Ok(record) = DebtRecord::new(
            members[creditor_idx].clone(),
            members[debtor_idx].clone(),
            amount,
        ) {
            set.add(record);
        }
    }

    set
}
