use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use scribe_core::transcript::handler::MAX_UPLOAD_BYTES;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::{
    docs::{dto::ApiDoc, handler::api_docs},
    health::handler::health,
    metrics::handler::{metrics, track_requests},
    search::handler::search,
    state::ServerState,
    stats::handler::stats,
    status::handler::get_status,
    summarize::handler::{summarize, summarize_upload},
    summary::handler::{delete_summary, get_summary},
};

/// Room for multipart boundaries and headers around a maximum-size file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: Arc<ServerState>) -> Router {
    let doc = ApiDoc::openapi();

    Router::new()
        .merge(Redoc::with_url("/redoc", doc))
        .route(
            "/summarize",
            post(summarize).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/summarize/upload",
            post(summarize_upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
        )
        .route("/status/{task_id}", get(get_status))
        .route("/summary/{task_id}", get(get_summary).delete(delete_summary))
        .route("/search", get(search))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(metrics))
        .route("/docs", get(api_docs))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
