use chrono::{DateTime, Utc};
use scribe_core::archive::dto::ArchiveStats;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueueStats {
    pub pending_jobs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub archive: ArchiveStats,
    pub queue: QueueStats,
    pub timestamp: DateTime<Utc>,
}
