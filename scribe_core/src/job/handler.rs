use std::{sync::Arc, time::Instant};

use uuid::Uuid;

use crate::{
    archive::handler::ResultStore,
    error::{ScribeError, ScribeResult},
    job::{
        dto::{Job, JobStatus, OrchestratorConfig, SubmitReceipt},
        queue::JobQueue,
        storage::JobStorage,
    },
    summarizer::{
        dto::{EngineProgress, SummarizationResult, SummaryStyle},
        handler::Summarizer,
    },
};

/// Called with the result of every job that completes.
pub type CompletionHook = Arc<dyn Fn(&SummarizationResult) + Send + Sync>;

const MIN_ESTIMATE_SECS: u64 = 30;

const PROGRESS_STARTED: u8 = 10;
const PROGRESS_ENGINE: u8 = 20;
const PROGRESS_MAP_END: u8 = 85;
const PROGRESS_ARCHIVING: u8 = 90;
const PROGRESS_DONE: u8 = 100;

#[derive(Clone)]
pub struct Orchestrator {
    summarizer: Summarizer,
    storage: JobStorage,
    queue: Arc<dyn JobQueue>,
    archive: Arc<dyn ResultStore>,
    config: OrchestratorConfig,
    on_complete: Option<CompletionHook>,
}

impl
    From<(
        Summarizer,
        JobStorage,
        Arc<dyn JobQueue>,
        Arc<dyn ResultStore>,
        OrchestratorConfig,
    )> for Orchestrator
{
    fn from(
        (summarizer, storage, queue, archive, config): (
            Summarizer,
            JobStorage,
            Arc<dyn JobQueue>,
            Arc<dyn ResultStore>,
            OrchestratorConfig,
        ),
    ) -> Self {
        Self {
            summarizer,
            storage,
            queue,
            archive,
            config,
            on_complete: None,
        }
    }
}

impl Orchestrator {
    pub fn with_completion_hook(mut self, hook: CompletionHook) -> Self {
        self.on_complete = Some(hook);
        self
    }

    pub fn get_summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn get_queue(&self) -> Arc<dyn JobQueue> {
        self.queue.clone()
    }

    pub fn get_archive(&self) -> Arc<dyn ResultStore> {
        self.archive.clone()
    }

    pub fn get_config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub async fn submit(&self, text: String, style: SummaryStyle) -> ScribeResult<SubmitReceipt> {
        if text.trim().is_empty() {
            return Err(ScribeError::Validation("Text cannot be empty".to_string()));
        }

        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(ScribeError::PayloadTooLarge {
                length,
                max: self.config.max_text_length,
            });
        }

        let job = Job::from((Uuid::new_v4().to_string(), style));
        self.storage.insert(&job, &text)?;

        if let Err(e) = self.queue.push(&job.id).await {
            log::error!("Failed to enqueue job {}: {}", job.id, e);
            self.storage
                .fail(&job.id, &format!("Failed to enqueue job: {}", e))?;
            return Err(e);
        }

        log::info!(
            "Queued job {} ({} characters, style {})",
            job.id,
            length,
            style
        );

        Ok(SubmitReceipt {
            job_id: job.id,
            status: JobStatus::Pending,
            estimated_completion_time: estimate_completion_secs(length),
        })
    }

    pub fn get_status(&self, job_id: &str) -> ScribeResult<Job> {
        self.storage
            .get(job_id)?
            .ok_or_else(|| ScribeError::NotFound(job_id.to_string()))
    }

    pub async fn get_result(&self, job_id: &str) -> ScribeResult<SummarizationResult> {
        match self.storage.get(job_id)? {
            Some(job) => match job.status {
                JobStatus::Pending | JobStatus::Processing { .. } => {
                    Err(ScribeError::NotReady(job_id.to_string()))
                }
                JobStatus::Completed { result } => Ok(result),
                JobStatus::Failed { error_message } => Err(ScribeError::Failed(error_message)),
            },
            None => match self.archive.get(job_id).await {
                Ok(Some(result)) => Ok(result),
                Ok(None) => Err(ScribeError::NotFound(job_id.to_string())),
                Err(e) => {
                    log::warn!("Archive lookup for job {} failed: {}", job_id, e);
                    Err(ScribeError::NotFound(job_id.to_string()))
                }
            },
        }
    }

    /// Runs one job to a terminal state. Jobs that are already claimed or
    /// finished are skipped, so duplicate queue entries are harmless.
    pub async fn execute(&self, job_id: &str) -> ScribeResult<()> {
        if !self.storage.claim(job_id)? {
            log::warn!("Job {} is not pending, skipping", job_id);
            return Ok(());
        }

        // Once claimed, nothing else will move the job, so every error
        // from here on has to leave it FAILED.
        if let Err(e) = self.run_claimed(job_id).await {
            self.fail_claimed(job_id, &e);
            return Err(e);
        }

        Ok(())
    }

    /// Removes a finished job together with its archived summary and
    /// original text. Returns false when nothing was stored under the id.
    pub async fn delete(&self, job_id: &str) -> ScribeResult<bool> {
        if let Some(job) = self.storage.get(job_id)? {
            if !job.status.is_terminal() {
                return Err(ScribeError::Validation(format!(
                    "Job {} is still {} and cannot be deleted",
                    job_id,
                    job.status.label()
                )));
            }
        }

        let archived = self.archive.delete(job_id).await?;
        let recorded = self.storage.remove(job_id)?;

        if archived || recorded {
            log::info!("Deleted job {}", job_id);
        }

        Ok(archived || recorded)
    }

    async fn run_claimed(&self, job_id: &str) -> ScribeResult<()> {
        let started = Instant::now();
        log::info!("Processing job {}", job_id);

        let job = self.get_status(job_id)?;
        let Some(text) = self.storage.input(job_id)? else {
            log::error!("Input text for job {} is missing", job_id);
            self.storage.fail(job_id, "Input text is missing")?;
            return Ok(());
        };

        self.report_progress(job_id, PROGRESS_STARTED);
        self.report_progress(job_id, PROGRESS_ENGINE);

        match self.run_engine(job_id, &text, job.style).await {
            Ok(mut result) => {
                result.processing_time = Some(started.elapsed().as_secs_f64());

                self.report_progress(job_id, PROGRESS_ARCHIVING);
                if let Err(e) = self.archive.store(job_id, &text, &result).await {
                    log::warn!("Could not archive result of job {}: {}", job_id, e);
                }
                self.report_progress(job_id, PROGRESS_DONE);

                let finished = self.on_complete.as_ref().map(|hook| (hook, result.clone()));
                self.storage.complete(job_id, result)?;
                if let Some((hook, result)) = finished {
                    hook(&result);
                }
                log::info!(
                    "Job {} completed in {:.2}s",
                    job_id,
                    started.elapsed().as_secs_f64()
                );
            }
            Err(e) => {
                log::error!("Job {} failed: {}", job_id, e);
                self.storage.fail(job_id, &e.to_string())?;
            }
        }

        Ok(())
    }

    fn fail_claimed(&self, job_id: &str, error: &ScribeError) {
        log::error!("Job {} errored after it was claimed: {}", job_id, error);

        if let Err(e) = self.storage.fail(job_id, &error.to_string()) {
            log::error!("Could not mark job {} as failed: {}", job_id, e);
        }
    }

    /// Puts every pending job back on the queue. Returns how many were queued.
    pub async fn recover_pending(&self) -> ScribeResult<usize> {
        let pending = self.storage.pending_ids()?;

        for job_id in &pending {
            self.queue.push(job_id).await?;
        }

        if !pending.is_empty() {
            log::info!("Re-queued {} pending jobs", pending.len());
        }

        Ok(pending.len())
    }

    async fn run_engine(
        &self,
        job_id: &str,
        text: &str,
        style: SummaryStyle,
    ) -> ScribeResult<SummarizationResult> {
        let mut attempt = 0;

        loop {
            let outcome = self
                .summarizer
                .summarize_with_progress(text, style, |progress| {
                    self.report_progress(job_id, map_progress(progress))
                })
                .await;

            match outcome {
                Err(ScribeError::Engine(e)) if attempt < self.config.retry_attempts => {
                    attempt += 1;
                    log::warn!(
                        "Job {} attempt {} failed: {}. Retrying in {:?}",
                        job_id,
                        attempt,
                        e,
                        self.config.retry_delay
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                other => return other,
            }
        }
    }

    fn report_progress(&self, job_id: &str, progress: u8) {
        if let Err(e) = self.storage.update_progress(job_id, progress) {
            log::warn!("Could not record progress for job {}: {}", job_id, e);
        }
    }
}

pub fn estimate_completion_secs(length: usize) -> u64 {
    MIN_ESTIMATE_SECS.max((length / 1000) as u64)
}

fn map_progress(progress: EngineProgress) -> u8 {
    let span = (PROGRESS_MAP_END - PROGRESS_ENGINE) as usize;
    let done = span * progress.completed_chunks / progress.total_chunks.max(1);
    PROGRESS_ENGINE + done.min(span) as u8
}
