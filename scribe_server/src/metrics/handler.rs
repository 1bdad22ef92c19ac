use std::{sync::Arc, time::Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::ErrorServer, state::ServerState};

#[utoipa::path(
    get,
    path = "/metrics",
    description = "Prometheus metrics",
    responses(
        (status = 200, description = "Text exposition format", content_type = "text/plain"),
    )
)]
#[axum::debug_handler]
pub async fn metrics(State(server_state): State<Arc<ServerState>>) -> Result<Response, ErrorServer> {
    let (content_type, body) = server_state.metrics().encode().map_err(|e| ErrorServer {
        status: StatusCode::INTERNAL_SERVER_ERROR.into(),
        message: format!("Failed to encode metrics: {}", e),
    })?;

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// Counts every routed request by method and route template.
pub async fn track_requests(
    State(server_state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    server_state
        .metrics()
        .record_request(&method, &endpoint, started.elapsed());

    response
}
