use scribe_core::{
    archive::dto::{ArchiveStats, SimilarSummary, SummaryMetadata},
    summarizer::dto::{SummarizationResult, SummaryStyle},
};
use utoipa::OpenApi;

use crate::{health, metrics, search, stats, status, summarize, summary};

#[derive(OpenApi)]
#[openapi(
    paths(
        summarize::handler::summarize,
        summarize::handler::summarize_upload,
        status::handler::get_status,
        summary::handler::get_summary,
        summary::handler::delete_summary,
        search::handler::search,
        health::handler::health,
        stats::handler::stats,
        metrics::handler::metrics,
    ),
    components(schemas(
        summarize::dto::SummarizeRequest,
        summarize::dto::SummarizeResponse,
        summarize::dto::UploadForm,
        status::dto::StatusResponse,
        summary::dto::DeleteResponse,
        search::dto::SearchResponse,
        health::dto::HealthResponse,
        stats::dto::StatsResponse,
        stats::dto::QueueStats,
        SummarizationResult,
        SummaryStyle,
        SummaryMetadata,
        SimilarSummary,
        ArchiveStats,
    ))
)]
pub struct ApiDoc;
