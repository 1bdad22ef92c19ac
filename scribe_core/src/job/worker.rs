use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::job::{handler::Orchestrator, queue::JobQueue};

/// Spawns `concurrency` consumer loops on the current runtime.
pub fn spawn_workers(
    orchestrator: Arc<Orchestrator>,
    queue: Arc<dyn JobQueue>,
    concurrency: usize,
    poll_interval: Duration,
) -> Vec<JoinHandle<()>> {
    (0..concurrency.max(1))
        .map(|worker_id| {
            let orchestrator = orchestrator.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                run_worker(worker_id, orchestrator, queue, poll_interval).await
            })
        })
        .collect()
}

async fn run_worker(
    worker_id: usize,
    orchestrator: Arc<Orchestrator>,
    queue: Arc<dyn JobQueue>,
    poll_interval: Duration,
) {
    log::info!("[worker {}] Starting consumer loop...", worker_id);

    loop {
        match queue.pop().await {
            Ok(Some(job_id)) => {
                if let Err(e) = orchestrator.execute(&job_id).await {
                    log::error!("[worker {}] Job {} errored: {}", worker_id, job_id, e);
                }
            }
            Ok(None) => tokio::time::sleep(poll_interval).await,
            Err(e) => {
                log::error!("[worker {}] Queue error: {}", worker_id, e);
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        archive::handler::{ResultStore, SledArchive},
        job::{dto::OrchestratorConfig, queue::MemoryQueue, storage::JobStorage},
        llm::{dto::LlmError, handler::LanguageModel},
        summarizer::{
            dto::{EngineConfig, SummaryStyle},
            handler::Summarizer,
        },
    };
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedModel;

    #[async_trait]
    impl LanguageModel for FixedModel {
        async fn invoke(&self, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok("short".to_string())
        }

        async fn health(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_workers_drain_queue() {
        let dir = TempDir::new().unwrap();
        let db = sled::open(dir.path()).unwrap();

        let queue: Arc<dyn JobQueue> = Arc::new(MemoryQueue::new());
        let archive: Arc<dyn ResultStore> = Arc::new(SledArchive::new(&db).unwrap());
        let summarizer = Summarizer::new(Arc::new(FixedModel), EngineConfig::default()).unwrap();

        let orchestrator = Arc::new(Orchestrator::from((
            summarizer,
            JobStorage::new(&db).unwrap(),
            queue.clone(),
            archive,
            OrchestratorConfig::default(),
        )));

        let mut job_ids = Vec::new();
        for i in 0..5 {
            let receipt = orchestrator
                .submit(format!("Transcript number {} {}", i, "A".repeat(40)), SummaryStyle::Brief)
                .await
                .unwrap();
            job_ids.push(receipt.job_id);
        }

        let handles = spawn_workers(orchestrator.clone(), queue.clone(), 2, Duration::from_millis(10));
        assert_eq!(handles.len(), 2);

        let all_done = async {
            loop {
                let finished = job_ids
                    .iter()
                    .filter(|id| orchestrator.get_status(id).unwrap().status.is_terminal())
                    .count();
                if finished == job_ids.len() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(10), all_done)
            .await
            .expect("jobs did not finish in time");

        for id in &job_ids {
            let result = orchestrator.get_result(id).await.unwrap();
            assert_eq!(result.summary, "short");
        }
        assert_eq!(queue.len().await.unwrap(), 0);

        for handle in handles {
            handle.abort();
        }
    }
}
