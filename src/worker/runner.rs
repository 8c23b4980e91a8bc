use crate::format::rows::{self, FormatError};
use crate::settlement::netting::{NettingEngine, NettingError};
use crate::worker::job::{JobDescriptor, JobOutcome, JobStatus};
use crate::worker::queue::{JobQueue, Message, QueueError};
use crate::worker::store::{ObjectStore, StoreError};
use chrono::Utc;
use log::{error, info};
use std::time::Duration;
use thiserror::Error;

/// Failure of a single job attempt. Logged, never retried.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("invalid job descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Netting(#[from] NettingError),
}

/// The queue-driven worker around the netting core.
///
/// Each poll processes at most one job synchronously. Whatever the
/// attempt's outcome, the triggering message is deleted afterwards:
/// at-most-once delivery, no retry, no dead-letter path.
pub struct Worker<Q, S> {
    queue: Q,
    store: S,
    wait: Duration,
}

impl<Q: JobQueue, S: ObjectStore> Worker<Q, S> {
    pub fn new(queue: Q, store: S, wait: Duration) -> Self {
        Self { queue, store, wait }
    }

    /// Wait for one message and process it.
    ///
    /// Returns `Ok(None)` when the wait expired without a message.
    /// Only queue transport failures surface as errors; job-level
    /// failures are folded into the returned outcome.
    pub fn poll_once(&mut self) -> Result<Option<JobOutcome>, QueueError> {
        let Some(message) = self.queue.receive(self.wait)? else {
            return Ok(None);
        };

        let started_at = Utc::now();
        let debts_id = peek_debts_id(&message.body);
        info!("started processing debts_id: {}", debts_id);

        let outcome = match self.process(&message) {
            Ok(()) => {
                info!("finished processing debts_id: {}", debts_id);
                JobOutcome {
                    debts_id,
                    status: JobStatus::Completed,
                    started_at,
                    finished_at: Utc::now(),
                    error: None,
                }
            }
            Err(e) => {
                error!("processing failed for debts_id: {}: {}", debts_id, e);
                JobOutcome {
                    debts_id,
                    status: JobStatus::Failed,
                    started_at,
                    finished_at: Utc::now(),
                    error: Some(e.to_string()),
                }
            }
        };

        // At-most-once: the message goes away even when the job failed.
        self.queue.delete(&message.receipt)?;
        Ok(Some(outcome))
    }

    fn process(&mut self, message: &Message) -> Result<(), WorkerError> {
        let descriptor: JobDescriptor = serde_json::from_str(&message.body)?;
        let raw = self.store.get(&descriptor.debts_id)?;
        let records = rows::parse_records(&raw)?;
        let result = NettingEngine::settle_records(&records)?;
        let body = rows::transfers_to_string(result.transfers())?;
        self.store.put(&descriptor.results_key(), &body)?;
        Ok(())
    }

    /// Poll forever. Queue transport errors are logged and the loop
    /// continues.
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.poll_once() {
                error!("error in message handling: {}", e);
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Best-effort extraction of the job id for log lines, even when the
/// descriptor fails to parse.
fn peek_debts_id(body: &str) -> String {
    serde_json::from_str::<JobDescriptor>(body)
        .map(|d| d.debts_id)
        .unwrap_or_else(|_| "<unparsable>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::queue::MemoryQueue;
    use crate::worker::store::MemoryStore;

    fn worker_with(
        objects: &[(&str, &str)],
        messages: &[&str],
    ) -> Worker<MemoryQueue, MemoryStore> {
        let mut store = MemoryStore::new();
        for (key, body) in objects {
            store.put(key, body).unwrap();
        }
        let mut queue = MemoryQueue::new();
        for message in messages {
            queue.send(message).unwrap();
        }
        Worker::new(queue, store, Duration::ZERO)
    }

    #[test]
    fn test_worker_happy_path() {
        let mut worker = worker_with(
            &[("trip", "Jacek,Dominik,10\nDominik,Jacek,5\nKasia,Dominik,5\nMichał,Kamil,13\n")],
            &[r#"{"debts_id": "trip"}"#],
        );

        let outcome = worker.poll_once().unwrap().unwrap();
        assert!(outcome.succeeded());
        assert_eq!(outcome.debts_id, "trip");

        let results = worker.store().get("trip_results").unwrap();
        let mut lines: Vec<&str> = results.lines().collect();
        lines.sort_unstable();
        assert_eq!(
            lines,
            vec!["Dominik,Jacek,5", "Dominik,Kasia,5", "Kamil,Michał,13"]
        );
    }

    #[test]
    fn test_worker_empty_queue() {
        let mut worker = worker_with(&[], &[]);
        assert!(worker.poll_once().unwrap().is_none());
    }

    #[test]
    fn test_worker_missing_object_still_deletes_message() {
        let mut worker = worker_with(&[], &[r#"{"debts_id": "absent"}"#]);

        let outcome = worker.poll_once().unwrap().unwrap();
        assert!(!outcome.succeeded());
        assert!(outcome.error.unwrap().contains("absent"));

        // Message is gone: no retry, results never materialize.
        assert!(worker.poll_once().unwrap().is_none());
        assert!(!worker.store().contains("absent_results"));
    }

    #[test]
    fn test_worker_malformed_records_fail_whole_job() {
        let mut worker = worker_with(
            &[("bad", "a,b,10\nc,d,not-a-number\n")],
            &[r#"{"debts_id": "bad"}"#],
        );

        let outcome = worker.poll_once().unwrap().unwrap();
        assert!(!outcome.succeeded());
        // No partial transfer list is ever stored.
        assert!(!worker.store().contains("bad_results"));
    }

    #[test]
    fn test_worker_unparsable_descriptor_consumes_message() {
        let mut worker = worker_with(&[], &["not json"]);

        let outcome = worker.poll_once().unwrap().unwrap();
        assert!(!outcome.succeeded());
        assert_eq!(outcome.debts_id, "<unparsable>");
        assert!(worker.poll_once().unwrap().is_none());
    }
}
