pub mod archive;
pub mod chunker;
pub mod config;
pub mod error;
pub mod job;
pub mod llm;
pub mod prompt;
pub mod summarizer;
pub mod transcript;

pub use error::{ScribeError, ScribeResult};
