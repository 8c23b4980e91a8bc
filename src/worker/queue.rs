use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown receipt handle: {0}")]
    UnknownReceipt(String),
}

/// Opaque handle identifying a received message for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A message received from the queue.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub body: String,
    pub receipt: ReceiptHandle,
}

/// Message queue seam between the worker loop and its transport.
///
/// `receive` blocks for at most `wait` and yields at most one message;
/// a received message stays on the queue until explicitly deleted by
/// receipt. The worker assumes a single consumer per queue.
pub trait JobQueue {
    fn send(&mut self, body: &str) -> Result<Uuid, QueueError>;
    fn receive(&mut self, wait: Duration) -> Result<Option<Message>, QueueError>;
    fn delete(&mut self, receipt: &ReceiptHandle) -> Result<(), QueueError>;
}

/// Filesystem-backed queue: one file per message in a spool directory.
///
/// File names embed the enqueue timestamp so lexicographic order is
/// arrival order. `receive` polls the directory until the wait expires.
#[derive(Debug)]
pub struct DirQueue {
    dir: PathBuf,
    poll_interval: Duration,
}

impl DirQueue {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            poll_interval: Duration::from_millis(250),
        })
    }

    fn oldest_message_path(&self) -> Result<Option<PathBuf>, QueueError> {
        let mut names: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "msg"))
            .collect();
        names.sort();
        Ok(names.into_iter().next())
    }
}

impl JobQueue for DirQueue {
    fn send(&mut self, body: &str) -> Result<Uuid, QueueError> {
        let id = Uuid::new_v4();
        let name = format!("{}-{}.msg", Utc::now().timestamp_nanos_opt().unwrap_or(0), id);
        fs::write(self.dir.join(name), body)?;
        Ok(id)
    }

    fn receive(&mut self, wait: Duration) -> Result<Option<Message>, QueueError> {
        let deadline = Instant::now() + wait;
        loop {
            if let Some(path) = self.oldest_message_path()? {
                let body = fs::read_to_string(&path)?;
                return Ok(Some(Message {
                    id: Uuid::new_v4(),
                    body,
                    receipt: ReceiptHandle::new(path.to_string_lossy()),
                }));
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            std::thread::sleep(self.poll_interval.min(remaining));
        }
    }

    fn delete(&mut self, receipt: &ReceiptHandle) -> Result<(), QueueError> {
        fs::remove_file(receipt.as_str())?;
        Ok(())
    }
}

/// In-memory queue for tests and demos.
///
/// Received messages move to an in-flight map; without a delete they
/// stay there and are never redelivered, matching the worker's
/// at-most-once contract.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    pending: VecDeque<(Uuid, String)>,
    in_flight: HashMap<ReceiptHandle, Uuid>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }
}

impl JobQueue for MemoryQueue {
    fn send(&mut self, body: &str) -> Result<Uuid, QueueError> {
        let id = Uuid::new_v4();
        self.pending.push_back((id, body.to_string()));
        Ok(id)
    }

    fn receive(&mut self, _wait: Duration) -> Result<Option<Message>, QueueError> {
        let Some((id, body)) = self.pending.pop_front() else {
            return Ok(None);
        };
        let receipt = ReceiptHandle::new(Uuid::new_v4().to_string());
        self.in_flight.insert(receipt.clone(), id);
        Ok(Some(Message { id, body, receipt }))
    }

    fn delete(&mut self, receipt: &ReceiptHandle) -> Result<(), QueueError> {
        self.in_flight
            .remove(receipt)
            .map(|_| ())
            .ok_or_else(|| QueueError::UnknownReceipt(receipt.as_str().to_string()))
    }
}
