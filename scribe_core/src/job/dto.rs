use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::summarizer::dto::{SummarizationResult, SummaryStyle};

/// Job lifecycle. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing { progress: u8 },
    Completed { result: SummarizationResult },
    Failed { error_message: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing { .. } => "processing",
            JobStatus::Completed { .. } => "completed",
            JobStatus::Failed { .. } => "failed",
        }
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            JobStatus::Processing { progress } => Some(*progress),
            JobStatus::Completed { .. } => Some(100),
            JobStatus::Pending | JobStatus::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub style: SummaryStyle,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(String, SummaryStyle)> for Job {
    fn from((id, style): (String, SummaryStyle)) -> Self {
        let now = Utc::now();
        Self {
            id,
            style,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Job {
    pub fn result(&self) -> Option<&SummarizationResult> {
        match &self.status {
            JobStatus::Completed { result } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Failed { error_message } => Some(error_message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub job_id: String,
    pub status: JobStatus,
    /// Seconds.
    pub estimated_completion_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    pub max_text_length: usize,
    /// Extra engine runs after a failed one. 0 disables retries.
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_text_length: 1_000_000,
            retry_attempts: 0,
            retry_delay: Duration::from_secs(2),
        }
    }
}
