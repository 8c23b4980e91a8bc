//! Foundational types: participants, debt records, balances, transfers.

pub mod balance;
pub mod participant;
pub mod record;
pub mod transfer;
