use std::{env, fmt::Display, str::FromStr, time::Duration};

use crate::{
    error::{ScribeError, ScribeResult},
    job::dto::OrchestratorConfig,
    summarizer::dto::EngineConfig,
};

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Settings {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub max_text_length: usize,
    pub redis_url: String,
    pub queue_name: String,
    pub db_path: String,
    pub max_workers: usize,
    pub worker_poll_ms: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub server_domain: String,
    pub api_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            chunk_size: 4000,
            chunk_overlap: 200,
            batch_size: 3,
            batch_delay_ms: 500,
            request_timeout_secs: 300,
            max_text_length: 1_000_000,
            redis_url: "redis://localhost:6379/0".to_string(),
            queue_name: "summarization".to_string(),
            db_path: "scribe_db".to_string(),
            max_workers: 4,
            worker_poll_ms: 1000,
            retry_attempts: 0,
            retry_delay_ms: 2000,
            server_domain: "0.0.0.0:8000".to_string(),
            api_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> ScribeResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            ollama_base_url: env::var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            chunk_size: parse_var("CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_var("CHUNK_OVERLAP", defaults.chunk_overlap)?,
            batch_size: parse_var("BATCH_SIZE", defaults.batch_size)?,
            batch_delay_ms: parse_var("BATCH_DELAY_MS", defaults.batch_delay_ms)?,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT", defaults.request_timeout_secs)?,
            max_text_length: parse_var("MAX_TEXT_LENGTH", defaults.max_text_length)?,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            queue_name: env::var("QUEUE_NAME").unwrap_or(defaults.queue_name),
            db_path: env::var("DB_PATH").unwrap_or(defaults.db_path),
            max_workers: parse_var("MAX_WORKERS", defaults.max_workers)?,
            worker_poll_ms: parse_var("WORKER_POLL_MS", defaults.worker_poll_ms)?,
            retry_attempts: parse_var("RETRY_ATTEMPTS", defaults.retry_attempts)?,
            retry_delay_ms: parse_var("RETRY_DELAY_MS", defaults.retry_delay_ms)?,
            server_domain: env::var("SERVER_DOMAIN").unwrap_or(defaults.server_domain),
            api_version: env::var("API_VERSION").unwrap_or(defaults.api_version),
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            batch_size: self.batch_size,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            call_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_text_length: self.max_text_length,
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn worker_poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker_poll_ms)
    }
}

fn parse_var<T>(key: &str, default: T) -> ScribeResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| {
            ScribeError::Configuration(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        env::remove_var("CHUNK_SIZE");
        env::remove_var("CHUNK_OVERLAP");
        env::remove_var("BATCH_SIZE");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.chunk_size, 4000);
        assert_eq!(settings.chunk_overlap, 200);
        assert_eq!(settings.batch_size, 3);
        assert_eq!(settings.engine_config().batch_delay, Duration::from_millis(500));
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        env::set_var("CHUNK_SIZE", "1200");
        env::set_var("MAX_TEXT_LENGTH", "5000");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.chunk_size, 1200);
        assert_eq!(settings.orchestrator_config().max_text_length, 5000);

        env::remove_var("CHUNK_SIZE");
        env::remove_var("MAX_TEXT_LENGTH");
    }

    #[test]
    #[serial]
    fn test_rejects_unparseable_number() {
        env::set_var("BATCH_SIZE", "three");

        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, ScribeError::Configuration(_)));
        assert!(err.to_string().contains("BATCH_SIZE"));

        env::remove_var("BATCH_SIZE");
    }
}
