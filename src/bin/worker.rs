//! settlement-worker
//!
//! Queue-driven worker: polls a spool directory for job descriptors,
//! settles the referenced record objects, and stores the transfer rows
//! back under `"{debts_id}_results"`.
//!
//! # Configuration (environment)
//!
//! - `WORKER_QUEUE_DIR` — spool directory for job messages (required)
//! - `WORKER_STORE_DIR` — object directory for records/results (required)
//! - `WORKER_WAIT_SECS` — bounded receive wait per poll (default: 20)

use log::info;
use settlement_engine::worker::queue::DirQueue;
use settlement_engine::worker::runner::Worker;
use settlement_engine::worker::store::DirStore;
use std::process;
use std::time::Duration;

fn required_env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        eprintln!("{} must be set", name);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();

    let queue_dir = required_env("WORKER_QUEUE_DIR");
    let store_dir = required_env("WORKER_STORE_DIR");
    let wait_secs: u64 = std::env::var("WORKER_WAIT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);

    let queue = DirQueue::open(&queue_dir).unwrap_or_else(|e| {
        eprintln!("Cannot open queue directory '{}': {}", queue_dir, e);
        process::exit(1);
    });
    let store = DirStore::open(&store_dir).unwrap_or_else(|e| {
        eprintln!("Cannot open store directory '{}': {}", store_dir, e);
        process::exit(1);
    });

    info!("worker started (queue: {}, store: {})", queue_dir, store_dir);
    let mut worker = Worker::new(queue, store, Duration::from_secs(wait_secs));
    worker.run()
}
