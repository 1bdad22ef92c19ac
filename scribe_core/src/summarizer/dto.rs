use std::{fmt, str::FromStr, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    chunker::dto::ChunkerConfig, error::ScribeError, llm::dto::LlmError, prompt::dto::Phase,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    Comprehensive,
    Brief,
    KeyPoints,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Comprehensive => "comprehensive",
            SummaryStyle::Brief => "brief",
            SummaryStyle::KeyPoints => "key_points",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStyle {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comprehensive" => Ok(SummaryStyle::Comprehensive),
            "brief" => Ok(SummaryStyle::Brief),
            "key_points" => Ok(SummaryStyle::KeyPoints),
            other => Err(ScribeError::Validation(format!(
                "Invalid summary type '{}', expected one of: comprehensive, brief, key_points",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummarizationResult {
    pub summary: String,
    pub original_length: usize,
    pub summary_length: usize,
    pub compression_ratio: f64,
    pub chunk_count: usize,
    pub summary_type: SummaryStyle,
    /// Seconds, set once the job finishes.
    pub processing_time: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl SummarizationResult {
    pub fn new(original: &str, summary: String, chunk_count: usize, style: SummaryStyle) -> Self {
        let original_length = original.chars().count();
        let summary_length = summary.chars().count();

        let compression_ratio = if summary_length == 0 {
            0.0
        } else {
            original_length as f64 / summary_length as f64
        };

        Self {
            summary,
            original_length,
            summary_length,
            compression_ratio,
            chunk_count,
            summary_type: style,
            processing_time: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub call_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            chunk_overlap: 200,
            batch_size: 3,
            batch_delay: Duration::from_millis(500),
            call_timeout: Duration::from_secs(300),
        }
    }
}

impl EngineConfig {
    pub fn chunker_config(&self) -> ChunkerConfig {
        ChunkerConfig::from((self.chunk_size, self.chunk_overlap))
    }
}

/// Reported after each map batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineProgress {
    pub completed_chunks: usize,
    pub total_chunks: usize,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{phase} call failed{}: {source}", chunk_label(.chunk))]
    Llm {
        phase: Phase,
        chunk: Option<usize>,
        source: LlmError,
    },

    #[error("{phase} call timed out after {timeout:?}{}", chunk_label(.chunk))]
    Timeout {
        phase: Phase,
        chunk: Option<usize>,
        timeout: Duration,
    },
}

fn chunk_label(chunk: &Option<usize>) -> String {
    chunk
        .map(|index| format!(" on chunk {}", index))
        .unwrap_or_default()
}
