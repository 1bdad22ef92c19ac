use async_trait::async_trait;
use reqwest::Client;

use crate::llm::dto::{GenerateOptions, GenerateRequest, GenerateResponse, LlmError, TagsResponse};

/// Text in, text out. Implementations must be safe to call concurrently.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError>;

    async fn health(&self) -> Result<(), LlmError>;
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn get_model(&self) -> &str {
        &self.model
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.options,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response.json().await?;

        if let Some(error) = generated.error {
            return Err(LlmError::Response(error));
        }

        Ok(generated.response)
    }

    async fn health(&self) -> Result<(), LlmError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let tags: TagsResponse = response.json().await?;

        // "llama3" matches "llama3:latest"
        let available = tags.models.iter().any(|tag| {
            tag.name == self.model || tag.name.split(':').next() == Some(self.model.as_str())
        });

        if !available {
            return Err(LlmError::ModelUnavailable(self.model.clone()));
        }

        Ok(())
    }
}
