//! # settlement-engine
//!
//! Settles a group's pairwise debts with a small number of transfers.
//!
//! Given a list of debt records (who owes whom, how much), the engine
//! splits participants into independent settlement groups, computes each
//! participant's net position, and emits per-group transfer lists via an
//! exact-match fast path followed by greedy largest-first matching.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, debt records, balances, transfers
//! - **graph** — Undirected debt graph and connected-component discovery
//! - **settlement** — The two-phase netting engine
//! - **format** — The headerless CSV row format shared by both surfaces
//! - **worker** — Queue-driven job processing around the core
//! - **simulation** — Random network generation for testing

pub mod core;
pub mod format;
pub mod graph;
pub mod settlement;
pub mod simulation;
pub mod worker;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::participant::ParticipantId;
    pub use crate::core::record::{Amount, DebtRecord, DebtRecordSet};
    pub use crate::core::transfer::Transfer;
    pub use crate::graph::adjacency::DebtGraph;
    pub use crate::graph::components::{find_components, Component};
    pub use crate::settlement::netting::{NettingEngine, NettingError, SettlementResult};
}
