//! Queue-driven job surface around the netting core.
//!
//! A message queue delivers job descriptors; raw record text is fetched
//! from an object store, settled, and the transfer rows are stored back
//! under a derived key. Delivery is deliberately at-most-once: the
//! message is removed after the attempt whether or not it succeeded.

pub mod job;
pub mod queue;
pub mod runner;
pub mod store;
