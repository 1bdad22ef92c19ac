use chrono::{DateTime, Utc};
use scribe_core::{job::dto::Job, summarizer::dto::SummarizationResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub task_id: String,
    /// pending, processing, completed or failed.
    pub status: String,
    /// 0..=100 while processing, 100 once completed.
    pub progress: Option<u8>,
    pub result: Option<SummarizationResult>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for StatusResponse {
    fn from(job: Job) -> Self {
        Self {
            status: job.status.label().to_string(),
            progress: job.status.progress(),
            result: job.result().cloned(),
            error_message: job.error_message().map(str::to_string),
            task_id: job.id,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
