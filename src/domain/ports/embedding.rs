//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for nearest-neighbor search.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};

/// Trait for embedding providers.
///
/// Implementations must be deterministic for identical input and model
/// version, and must return exactly one vector per input text, in order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier (e.g., "all-minilm"); recorded alongside persisted indexes.
    fn model_name(&self) -> &str;

    /// Generate embeddings for a batch of texts.
    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::EmbeddingFailed("Empty embedding response".to_string()))
    }
}
