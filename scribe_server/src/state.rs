use std::sync::Arc;

use crate::metrics::dto::ServerMetrics;
use scribe_core::{
    archive::handler::ResultStore, job::handler::Orchestrator, job::queue::JobQueue,
    llm::handler::LanguageModel,
};

#[derive(Clone)]
pub struct ServerState {
    orchestrator: Arc<Orchestrator>,
    metrics: Arc<ServerMetrics>,
    version: String,
}

impl From<(Arc<Orchestrator>, Arc<ServerMetrics>, String)> for ServerState {
    fn from(states: (Arc<Orchestrator>, Arc<ServerMetrics>, String)) -> Self {
        let (orchestrator, metrics, version) = states;
        Self {
            orchestrator,
            metrics,
            version,
        }
    }
}

impl ServerState {
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn archive(&self) -> Arc<dyn ResultStore> {
        self.orchestrator.get_archive()
    }

    pub fn queue(&self) -> Arc<dyn JobQueue> {
        self.orchestrator.get_queue()
    }

    pub fn llm(&self) -> Arc<dyn LanguageModel> {
        self.orchestrator.get_summarizer().get_llm()
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.metrics
    }

    pub fn version(&self) -> String {
        self.version.clone()
    }
}
