use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use sled::{Db, Tree};

use crate::{
    archive::dto::{
        ArchiveStats, ArchivedOriginal, ArchivedSummary, SimilarSummary, SummaryMetadata,
    },
    summarizer::dto::{SummarizationResult, SummaryStyle},
};

const ARCHIVE_TREE: &str = "archive";
const SUMMARY_PREFIX: &str = "summary_";
const ORIGINAL_PREFIX: &str = "original_";

/// Durable home for finished summaries and the text they came from.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Returns the id of the stored summary record.
    async fn store(
        &self,
        job_id: &str,
        original: &str,
        result: &SummarizationResult,
    ) -> Result<String>;

    async fn get(&self, job_id: &str) -> Result<Option<SummarizationResult>>;

    async fn search_similar(
        &self,
        query: &str,
        limit: usize,
        style: Option<SummaryStyle>,
    ) -> Result<Vec<SimilarSummary>>;

    /// True when at least one record existed.
    async fn delete(&self, job_id: &str) -> Result<bool>;

    async fn stats(&self) -> Result<ArchiveStats>;

    async fn health(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct SledArchive {
    tree: Tree,
}

impl SledArchive {
    pub fn new(db: &Db) -> Result<Self> {
        let tree = db.open_tree(ARCHIVE_TREE)?;
        Ok(Self { tree })
    }

    fn summary_key(job_id: &str) -> String {
        format!("{}{}", SUMMARY_PREFIX, job_id)
    }

    fn original_key(job_id: &str) -> String {
        format!("{}{}", ORIGINAL_PREFIX, job_id)
    }

    fn summaries(&self) -> Result<Vec<(String, ArchivedSummary)>> {
        let mut summaries = Vec::new();

        for entry in self.tree.scan_prefix(SUMMARY_PREFIX) {
            let (key, bytes) = entry?;
            let id = String::from_utf8_lossy(&key).into_owned();
            let archived: ArchivedSummary = serde_json::from_slice(&bytes)?;
            summaries.push((id, archived));
        }

        Ok(summaries)
    }
}

#[async_trait]
impl ResultStore for SledArchive {
    async fn store(
        &self,
        job_id: &str,
        original: &str,
        result: &SummarizationResult,
    ) -> Result<String> {
        let summary_id = Self::summary_key(job_id);

        let summary = ArchivedSummary {
            summary: result.summary.clone(),
            metadata: SummaryMetadata::from((job_id, result)),
        };

        let original = ArchivedOriginal {
            task_id: job_id.to_string(),
            text: original.to_string(),
            text_length: original.chars().count(),
            related_summary_id: summary_id.clone(),
            created_at: result.created_at,
        };

        self.tree
            .insert(&summary_id, serde_json::to_vec(&summary)?)?;
        self.tree
            .insert(Self::original_key(job_id), serde_json::to_vec(&original)?)?;

        log::info!("Archived summary {} for job {}", summary_id, job_id);

        Ok(summary_id)
    }

    async fn get(&self, job_id: &str) -> Result<Option<SummarizationResult>> {
        match self.tree.get(Self::summary_key(job_id))? {
            Some(bytes) => {
                let archived: ArchivedSummary = serde_json::from_slice(&bytes)?;
                Ok(Some(archived.into()))
            }
            None => Ok(None),
        }
    }

    async fn search_similar(
        &self,
        query: &str,
        limit: usize,
        style: Option<SummaryStyle>,
    ) -> Result<Vec<SimilarSummary>> {
        let query_terms = term_frequencies(query);

        let mut matches: Vec<SimilarSummary> = self
            .summaries()?
            .into_iter()
            .filter(|(_, archived)| style.map_or(true, |s| archived.metadata.summary_type == s))
            .map(|(id, archived)| SimilarSummary {
                similarity_score: cosine_similarity(
                    &query_terms,
                    &term_frequencies(&archived.summary),
                ),
                id,
                summary: archived.summary,
                metadata: archived.metadata,
            })
            .collect();

        matches.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        matches.truncate(limit);

        log::info!("Found {} similar summaries", matches.len());

        Ok(matches)
    }

    async fn delete(&self, job_id: &str) -> Result<bool> {
        let summary = self.tree.remove(Self::summary_key(job_id))?;
        let original = self.tree.remove(Self::original_key(job_id))?;

        let existed = summary.is_some() || original.is_some();
        if existed {
            log::info!("Deleted archived summary for job {}", job_id);
        } else {
            log::warn!("No archived summary to delete for job {}", job_id);
        }

        Ok(existed)
    }

    async fn stats(&self) -> Result<ArchiveStats> {
        let mut stats = ArchiveStats {
            total_documents: self.tree.len(),
            ..ArchiveStats::default()
        };

        for (_, archived) in self.summaries()? {
            stats.summary_count += 1;
            *stats
                .summary_types
                .entry(archived.metadata.summary_type.to_string())
                .or_insert(0) += 1;
        }

        stats.original_count = self.tree.scan_prefix(ORIGINAL_PREFIX).count();

        Ok(stats)
    }

    async fn health(&self) -> Result<()> {
        self.tree.first()?;
        Ok(())
    }
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut terms = HashMap::new();

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        *terms.entry(word.to_lowercase()).or_insert(0.0) += 1.0;
    }

    terms
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a
        .iter()
        .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
