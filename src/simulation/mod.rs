//! Random debt-network generation for benchmarks and manual testing.

pub mod generate;
