use std::sync::Arc;

use axum::{
    extract::{Json, Multipart, State},
    http::StatusCode,
};
use scribe_core::{summarizer::dto::SummaryStyle, transcript::handler::extract_text};

use crate::{
    error::ErrorServer,
    state::ServerState,
    summarize::dto::{SummarizeRequest, SummarizeResponse, UploadForm},
};

fn parse_style(raw: Option<&str>) -> Result<SummaryStyle, ErrorServer> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Ok(raw.parse::<SummaryStyle>()?),
        None => Ok(SummaryStyle::default()),
    }
}

#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeRequest,
    description = "Queue a transcript for summarization",
    responses(
        (status = 200, description = "Queued", body = SummarizeResponse),
        (status = 400, description = "Invalid text or summary type"),
        (status = 413, description = "Text too long"),
    )
)]
#[axum::debug_handler]
pub async fn summarize(
    State(server_state): State<Arc<ServerState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ErrorServer> {
    let style = parse_style(request.summary_type.as_deref())?;

    log::info!(
        "Received summarization request: {} characters, style {}",
        request.text.chars().count(),
        style
    );

    let receipt = server_state
        .orchestrator()
        .submit(request.text, style)
        .await?;
    server_state.metrics().record_submission(style);

    Ok(Json(SummarizeResponse::from((
        receipt,
        "Summarization task submitted successfully".to_string(),
    ))))
}

#[utoipa::path(
    post,
    path = "/summarize/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    description = "Upload a .vtt, .txt or .text transcript and queue it for summarization",
    responses(
        (status = 200, description = "Queued", body = SummarizeResponse),
        (status = 400, description = "Unsupported, unreadable or too short file"),
        (status = 413, description = "File too large"),
    )
)]
#[axum::debug_handler]
pub async fn summarize_upload(
    State(server_state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> Result<Json<SummarizeResponse>, ErrorServer> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut summary_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| ErrorServer {
        status: e.status().into(),
        message: e.body_text(),
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| ErrorServer {
                    status: e.status().into(),
                    message: e.body_text(),
                })?;
                file = Some((file_name, bytes.to_vec()));
            }
            "summary_type" => {
                let value = field.text().await.map_err(|e| ErrorServer {
                    status: e.status().into(),
                    message: e.body_text(),
                })?;
                summary_type = Some(value);
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or(ErrorServer {
        status: StatusCode::BAD_REQUEST.into(),
        message: "No file provided".to_string(),
    })?;

    if file_name.is_empty() {
        return Err(ErrorServer {
            status: StatusCode::BAD_REQUEST.into(),
            message: "No filename provided".to_string(),
        });
    }

    let style = parse_style(summary_type.as_deref())?;
    let transcript = extract_text(&file_name, &bytes)?;

    log::info!(
        "Received upload {}: {} bytes, {} characters extracted",
        file_name,
        bytes.len(),
        transcript.chars().count()
    );

    let receipt = server_state
        .orchestrator()
        .submit(transcript, style)
        .await?;
    server_state.metrics().record_submission(style);

    Ok(Json(SummarizeResponse::from((
        receipt,
        format!("File '{}' uploaded and queued for summarization", file_name),
    ))))
}
