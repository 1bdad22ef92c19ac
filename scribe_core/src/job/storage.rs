use chrono::Utc;
use sled::{Db, Tree};

use crate::{
    error::{ScribeError, ScribeResult},
    job::dto::{Job, JobStatus},
    summarizer::dto::SummarizationResult,
};

const JOBS_TREE: &str = "jobs";
const INPUTS_TREE: &str = "job_inputs";

/// Job records and their input text. Every status change goes through a
/// compare-and-swap, so concurrent writers cannot interleave. Inputs are
/// only kept until the job reaches a terminal state.
#[derive(Clone)]
pub struct JobStorage {
    jobs: Tree,
    inputs: Tree,
}

impl JobStorage {
    pub fn new(db: &Db) -> ScribeResult<Self> {
        let jobs = db.open_tree(JOBS_TREE)?;
        let inputs = db.open_tree(INPUTS_TREE)?;
        Ok(Self { jobs, inputs })
    }

    pub fn insert(&self, job: &Job, text: &str) -> ScribeResult<()> {
        self.inputs.insert(&job.id, text.as_bytes())?;
        self.jobs.insert(&job.id, serde_json::to_vec(job)?)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> ScribeResult<Option<Job>> {
        match self.jobs.get(id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn input(&self, id: &str) -> ScribeResult<Option<String>> {
        match self.inputs.get(id)? {
            Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            None => Ok(None),
        }
    }

    /// PENDING -> PROCESSING(0). Returns false when someone else got there first.
    pub fn claim(&self, id: &str) -> ScribeResult<bool> {
        let claimed = self.transition(id, |job| match job.status {
            JobStatus::Pending => Some(JobStatus::Processing { progress: 0 }),
            _ => None,
        })?;
        Ok(claimed.is_some())
    }

    /// Only moves progress forward, and only while processing.
    pub fn update_progress(&self, id: &str, progress: u8) -> ScribeResult<bool> {
        let progress = progress.min(100);
        let updated = self.transition(id, |job| match job.status {
            JobStatus::Processing { progress: current } if progress > current => {
                Some(JobStatus::Processing { progress })
            }
            _ => None,
        })?;
        Ok(updated.is_some())
    }

    pub fn complete(&self, id: &str, result: SummarizationResult) -> ScribeResult<bool> {
        let completed = self.transition(id, |job| match job.status {
            JobStatus::Processing { .. } => Some(JobStatus::Completed {
                result: result.clone(),
            }),
            _ => None,
        })?;

        if completed.is_some() {
            self.inputs.remove(id)?;
        }
        Ok(completed.is_some())
    }

    pub fn fail(&self, id: &str, error_message: &str) -> ScribeResult<bool> {
        let failed = self.transition(id, |job| {
            if job.status.is_terminal() {
                None
            } else {
                Some(JobStatus::Failed {
                    error_message: error_message.to_string(),
                })
            }
        })?;

        if failed.is_some() {
            self.inputs.remove(id)?;
        }
        Ok(failed.is_some())
    }

    /// Drops the job record and any input left behind. True when the
    /// record existed.
    pub fn remove(&self, id: &str) -> ScribeResult<bool> {
        self.inputs.remove(id)?;
        Ok(self.jobs.remove(id)?.is_some())
    }

    /// Oldest first.
    pub fn pending_ids(&self) -> ScribeResult<Vec<String>> {
        let mut pending = Vec::new();

        for entry in self.jobs.iter() {
            let (_, bytes) = entry?;
            let job: Job = serde_json::from_slice(&bytes)?;
            if job.status == JobStatus::Pending {
                pending.push(job);
            }
        }

        pending.sort_by_key(|job| job.created_at);
        Ok(pending.into_iter().map(|job| job.id).collect())
    }

    fn transition<F>(&self, id: &str, next_status: F) -> ScribeResult<Option<Job>>
    where
        F: Fn(&Job) -> Option<JobStatus>,
    {
        loop {
            let current = self
                .jobs
                .get(id)?
                .ok_or_else(|| ScribeError::NotFound(id.to_string()))?;
            let job: Job = serde_json::from_slice(&current)?;

            let Some(status) = next_status(&job) else {
                return Ok(None);
            };

            let mut updated = job;
            updated.status = status;
            updated.updated_at = Utc::now();
            let bytes = serde_json::to_vec(&updated)?;

            match self.jobs.compare_and_swap(id, Some(current), Some(bytes))? {
                Ok(()) => return Ok(Some(updated)),
                Err(_) => continue,
            }
        }
    }
}
