use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::summarizer::dto::{SummarizationResult, SummaryStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryMetadata {
    pub task_id: String,
    pub summary_type: SummaryStyle,
    pub original_length: usize,
    pub summary_length: usize,
    pub compression_ratio: f64,
    pub chunk_count: usize,
    pub processing_time: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<(&str, &SummarizationResult)> for SummaryMetadata {
    fn from((task_id, result): (&str, &SummarizationResult)) -> Self {
        Self {
            task_id: task_id.to_string(),
            summary_type: result.summary_type,
            original_length: result.original_length,
            summary_length: result.summary_length,
            compression_ratio: result.compression_ratio,
            chunk_count: result.chunk_count,
            processing_time: result.processing_time,
            created_at: result.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedSummary {
    pub summary: String,
    pub metadata: SummaryMetadata,
}

impl From<ArchivedSummary> for SummarizationResult {
    fn from(archived: ArchivedSummary) -> Self {
        let metadata = archived.metadata;
        Self {
            summary: archived.summary,
            original_length: metadata.original_length,
            summary_length: metadata.summary_length,
            compression_ratio: metadata.compression_ratio,
            chunk_count: metadata.chunk_count,
            summary_type: metadata.summary_type,
            processing_time: metadata.processing_time,
            created_at: metadata.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedOriginal {
    pub task_id: String,
    pub text: String,
    pub text_length: usize,
    pub related_summary_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimilarSummary {
    pub id: String,
    pub summary: String,
    pub metadata: SummaryMetadata,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArchiveStats {
    pub total_documents: usize,
    pub summary_count: usize,
    pub original_count: usize,
    pub summary_types: BTreeMap<String, usize>,
}
