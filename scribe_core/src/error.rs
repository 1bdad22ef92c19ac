use thiserror::Error;

use crate::summarizer::dto::EngineError;

#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Text too long: {length} characters (maximum is {max})")]
    PayloadTooLarge { length: usize, max: usize },

    #[error("File too large: {size} bytes (maximum is {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job {0} is still processing")]
    NotReady(String),

    #[error("Job failed: {0}")]
    Failed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Queue error: {0}")]
    Queue(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] anyhow::Error),
}

pub type ScribeResult<T> = Result<T, ScribeError>;
