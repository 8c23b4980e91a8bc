//! Debt graph construction and connected-component discovery.

pub mod adjacency;
pub mod components;
