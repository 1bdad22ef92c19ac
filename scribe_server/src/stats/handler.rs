use std::sync::Arc;

use axum::extract::{Json, State};
use chrono::Utc;
use scribe_core::ScribeError;

use crate::{
    error::ErrorServer,
    state::ServerState,
    stats::dto::{QueueStats, StatsResponse},
};

#[utoipa::path(
    get,
    path = "/stats",
    description = "Archive counts and queue depth",
    responses(
        (status = 200, description = "Statistics", body = StatsResponse),
        (status = 500, description = "Archive or queue unavailable"),
    )
)]
#[axum::debug_handler]
pub async fn stats(
    State(server_state): State<Arc<ServerState>>,
) -> Result<Json<StatsResponse>, ErrorServer> {
    let archive = server_state
        .archive()
        .stats()
        .await
        .map_err(ScribeError::from)?;
    let pending_jobs = server_state.queue().len().await?;

    Ok(Json(StatsResponse {
        archive,
        queue: QueueStats { pending_jobs },
        timestamp: Utc::now(),
    }))
}
