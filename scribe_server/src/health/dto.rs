use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// healthy when every service answers, degraded otherwise.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub services: BTreeMap<String, String>,
}
