use std::sync::Arc;

use axum::extract::{Json, Path, State};

use crate::{error::ErrorServer, state::ServerState, status::dto::StatusResponse};

#[utoipa::path(
    get,
    path = "/status/{task_id}",
    params(("task_id" = String, Path, description = "Id returned by /summarize")),
    description = "Current state and progress of a summarization task",
    responses(
        (status = 200, description = "Task state", body = StatusResponse),
        (status = 404, description = "Unknown task"),
    )
)]
#[axum::debug_handler]
pub async fn get_status(
    State(server_state): State<Arc<ServerState>>,
    Path(task_id): Path<String>,
) -> Result<Json<StatusResponse>, ErrorServer> {
    let job = server_state.orchestrator().get_status(&task_id)?;

    Ok(Json(StatusResponse::from(job)))
}
