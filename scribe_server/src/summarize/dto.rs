use scribe_core::job::dto::SubmitReceipt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    pub text: String,
    /// comprehensive, brief or key_points. Defaults to comprehensive.
    #[serde(default)]
    pub summary_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    pub task_id: String,
    pub status: String,
    pub message: String,
    /// Seconds.
    pub estimated_completion_time: u64,
}

impl From<(SubmitReceipt, String)> for SummarizeResponse {
    fn from((receipt, message): (SubmitReceipt, String)) -> Self {
        Self {
            task_id: receipt.job_id,
            status: receipt.status.label().to_string(),
            message,
            estimated_completion_time: receipt.estimated_completion_time,
        }
    }
}

/// Multipart form accepted by `/summarize/upload`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    /// .vtt, .txt or .text file, UTF-8, at most 10 MB.
    #[schema(format = Binary, value_type = String)]
    pub file: Vec<u8>,
    pub summary_type: Option<String>,
}
