use std::{collections::BTreeMap, sync::Arc};

use axum::extract::{Json, State};
use chrono::Utc;

use crate::{error::ErrorServer, health::dto::HealthResponse, state::ServerState};

fn service_status<E: std::fmt::Display>(name: &str, outcome: Result<(), E>) -> String {
    match outcome {
        Ok(()) => "healthy".to_string(),
        Err(e) => {
            log::warn!("Health check for {} failed: {}", name, e);
            format!("unhealthy: {}", e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    description = "Reachability of the queue, the archive and the language model",
    responses(
        (status = 200, description = "Service health", body = HealthResponse),
    )
)]
#[axum::debug_handler]
pub async fn health(
    State(server_state): State<Arc<ServerState>>,
) -> Result<Json<HealthResponse>, ErrorServer> {
    let (queue, archive, llm) = tokio::join!(
        async { server_state.queue().ping().await },
        async { server_state.archive().health().await },
        async { server_state.llm().health().await },
    );

    let mut services = BTreeMap::new();
    services.insert("queue".to_string(), service_status("queue", queue));
    services.insert("archive".to_string(), service_status("archive", archive));
    services.insert("llm".to_string(), service_status("llm", llm));

    let status = if services.values().all(|s| s == "healthy") {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        version: server_state.version(),
        services,
    }))
}
