use crate::core::participant::ParticipantId;
use crate::graph::adjacency::DebtGraph;
use std::collections::BTreeSet;

/// A maximal set of participants connected through chains of debt records.
///
/// Components partition the full participant set; settlements never
/// cross component boundaries, and the balances of a component's members
/// always sum to zero (every record contributes equal and opposite
/// amounts to two members of the same component).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    members: Vec<ParticipantId>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in id order.
    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.binary_search(participant).is_ok()
    }
}

/// Partition the graph's participants into connected components.
///
/// Traversal uses an explicit `Vec`-backed stack rather than recursion,
/// so arbitrarily large participant graphs cannot overflow the call
/// stack. Nodes are marked visited on pop; unvisited neighbours are
/// pushed. O(V + E).
///
/// Participants are seeded in id order, so both the discovery order of
/// components and the member order within each component are
/// deterministic for any input order.
pub fn find_components(graph: &DebtGraph) -> Vec<Component> {
    let mut visited: BTreeSet<ParticipantId> = BTreeSet::new();
    let mut components = Vec::new();

    for seed in graph.participants() {
        if visited.contains(seed) {
            continue;
        }

        let mut members = Vec::new();
        let mut stack = vec![seed.clone()];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(neighbours) = graph.neighbours(&current) {
                stack.extend(
                    neighbours
                        .iter()
                        .filter(|n| !visited.contains(*n))
                        .cloned(),
                );
            }
            members.push(current);
        }

        members.sort();
        components.push(Component { members });
    }

    components
}
