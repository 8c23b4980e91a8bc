//! Two-phase settlement: exact-match fast path, then greedy largest-first.

pub mod netting;
