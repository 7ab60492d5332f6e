//! Ollama HTTP client.
//!
//! One client type serves both the embedding endpoint (`/api/embed`) and the
//! completion endpoint (`/api/generate`); an instance is bound to a single
//! model, so the embedder and the generator are separate instances.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{EmbedRequest, EmbedResponse, GenerateOptions, GenerateRequest, GenerateResponse};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EmbeddingConfig, LlmConfig};
use crate::domain::ports::{EmbeddingProvider, LanguageModel};
use crate::infrastructure::http::{ApiError, RetryPolicy};

/// Client for a locally served Ollama model
pub struct OllamaClient {
    http_client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    retry_policy: RetryPolicy,
}

impl OllamaClient {
    /// Create a client for `model` at `base_url`
    pub fn new(
        base_url: &str,
        model: &str,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: 0.0,
            retry_policy,
        })
    }

    /// Client bound to the configured embedding model
    pub fn embedder(config: &EmbeddingConfig, retry_policy: RetryPolicy) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            &config.model_name,
            Duration::from_secs(config.timeout_secs),
            retry_policy,
        )
    }

    /// Client bound to the configured generative model.
    ///
    /// The HTTP timeout is the generation timeout; the agent enforces the
    /// same bound around the whole call.
    pub fn generator(config: &LlmConfig, retry_policy: RetryPolicy) -> Result<Self, ApiError> {
        let mut client = Self::new(
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_secs),
            retry_policy,
        )?;
        client.temperature = config.temperature;
        Ok(client)
    }

    async fn embed_once(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self.http_client.post(&url).json(&request).send().await?;
        let body: EmbedResponse = Self::handle_response(response).await?;
        Ok(body.embeddings)
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self.http_client.post(&url).json(&request).send().await?;
        let body: GenerateResponse = Self::handle_response(response).await?;
        if !body.done {
            tracing::debug!(model = %self.model, "generate response not marked done");
        }
        Ok(body.response)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(ApiError::from_status(status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self
            .retry_policy
            .execute(|| self.embed_once(texts))
            .await
            .map_err(|e| DomainError::EmbeddingFailed(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "Ollama returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> DomainResult<String> {
        self.retry_policy
            .execute(|| self.generate_once(prompt))
            .await
            .map_err(|e| DomainError::GenerationFailed(e.to_string()))
    }
}
