use std::sync::Arc;

use axum::{
    extract::{Json, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use scribe_core::{ScribeError, summarizer::dto::SummaryStyle};

use crate::{
    error::ErrorServer,
    search::dto::{SearchQuery, SearchResponse},
    state::ServerState,
};

#[utoipa::path(
    get,
    path = "/search",
    params(SearchQuery),
    description = "Archived summaries ranked by similarity to the query",
    responses(
        (status = 200, description = "Matches", body = SearchResponse),
        (status = 400, description = "Empty query, malformed parameters or invalid summary type"),
    )
)]
#[axum::debug_handler]
pub async fn search(
    State(server_state): State<Arc<ServerState>>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, ErrorServer> {
    let Query(params) = params.map_err(|e| ErrorServer {
        status: StatusCode::BAD_REQUEST.into(),
        message: e.body_text(),
    })?;

    if params.query.trim().is_empty() {
        return Err(ErrorServer {
            status: StatusCode::BAD_REQUEST.into(),
            message: "Query must not be empty".to_string(),
        });
    }

    let style = params
        .summary_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<SummaryStyle>)
        .transpose()?;

    let results = server_state
        .archive()
        .search_similar(&params.query, params.effective_limit(), style)
        .await
        .map_err(ScribeError::from)?;

    Ok(Json(SearchResponse {
        count: results.len(),
        query: params.query,
        results,
    }))
}
