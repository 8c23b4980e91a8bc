use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job descriptor delivered through the queue, as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Object-store key of the raw debt records. Results are stored
    /// under `"{debts_id}_results"`.
    pub debts_id: String,
}

impl JobDescriptor {
    pub fn new(debts_id: impl Into<String>) -> Self {
        Self {
            debts_id: debts_id.into(),
        }
    }

    /// Key under which this job's transfer rows are stored.
    pub fn results_key(&self) -> String {
        format!("{}_results", self.debts_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Completed,
    Failed,
}

/// Record of one processed job attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub debts_id: String,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Human-readable failure cause, for logs only.
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
