use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use scribe_core::summarizer::dto::SummarizationResult;

use crate::{error::ErrorServer, state::ServerState, summary::dto::DeleteResponse};

#[utoipa::path(
    get,
    path = "/summary/{task_id}",
    params(("task_id" = String, Path, description = "Id returned by /summarize")),
    description = "Finished summary of a task, served from the job record or the archive",
    responses(
        (status = 200, description = "Summary", body = SummarizationResult),
        (status = 202, description = "Still processing"),
        (status = 400, description = "Task failed"),
        (status = 404, description = "Unknown task"),
    )
)]
#[axum::debug_handler]
pub async fn get_summary(
    State(server_state): State<Arc<ServerState>>,
    Path(task_id): Path<String>,
) -> Result<Json<SummarizationResult>, ErrorServer> {
    let result = server_state.orchestrator().get_result(&task_id).await?;

    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/summary/{task_id}",
    params(("task_id" = String, Path, description = "Id returned by /summarize")),
    description = "Remove a finished task: its job record, archived summary and original text",
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 400, description = "Task is still pending or processing"),
        (status = 404, description = "Summary not found"),
    )
)]
#[axum::debug_handler]
pub async fn delete_summary(
    State(server_state): State<Arc<ServerState>>,
    Path(task_id): Path<String>,
) -> Result<Json<DeleteResponse>, ErrorServer> {
    let deleted = server_state.orchestrator().delete(&task_id).await?;

    if !deleted {
        return Err(ErrorServer {
            status: StatusCode::NOT_FOUND.into(),
            message: "Summary not found".to_string(),
        });
    }

    Ok(Json(DeleteResponse { task_id, deleted }))
}
