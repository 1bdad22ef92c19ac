mod docs;
mod error;
mod health;
mod metrics;
mod router;
mod search;
mod state;
mod stats;
mod status;
mod summarize;
mod summary;

use std::sync::Arc;

use dotenvy::dotenv;
use metrics::dto::ServerMetrics;
use router::router;
use scribe_core::{
    archive::handler::{ResultStore, SledArchive},
    config::Settings,
    job::{
        handler::Orchestrator,
        queue::{JobQueue, RedisQueue},
        storage::JobStorage,
        worker::spawn_workers,
    },
    llm::handler::{LanguageModel, OllamaClient},
    summarizer::{dto::SummarizationResult, handler::Summarizer},
};
use state::ServerState;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env()?;

    let db = sled::open(&settings.db_path)?;
    let queue: Arc<dyn JobQueue> =
        Arc::new(RedisQueue::connect(&settings.redis_url, &settings.queue_name).await?);
    let archive: Arc<dyn ResultStore> = Arc::new(SledArchive::new(&db)?);
    let llm: Arc<dyn LanguageModel> = Arc::new(OllamaClient::new(
        &settings.ollama_base_url,
        &settings.ollama_model,
    ));

    log::info!(
        "Using model {} at {}",
        settings.ollama_model,
        settings.ollama_base_url
    );

    let metrics = Arc::new(ServerMetrics::new()?);
    let job_metrics = metrics.clone();

    let summarizer = Summarizer::new(llm, settings.engine_config())?;
    let orchestrator = Arc::new(
        Orchestrator::from((
            summarizer,
            JobStorage::new(&db)?,
            queue.clone(),
            archive,
            settings.orchestrator_config(),
        ))
        .with_completion_hook(Arc::new(move |result: &SummarizationResult| {
            job_metrics.observe_summarization(result)
        })),
    );

    orchestrator.recover_pending().await?;

    let _workers = spawn_workers(
        orchestrator.clone(),
        queue,
        settings.max_workers,
        settings.worker_poll_interval(),
    );

    let state = Arc::new(ServerState::from((
        orchestrator,
        metrics,
        settings.api_version.clone(),
    )));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_domain).await?;
    log::info!("Listening on {}", settings.server_domain);

    axum::serve(listener, app).await?;

    Ok(())
}
