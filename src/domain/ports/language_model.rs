//! Generative language model port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// A text-in, text-out generative model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Generate a completion for the prompt.
    ///
    /// Transport failures are returned as `DomainError::GenerationFailed`.
    async fn generate(&self, prompt: &str) -> DomainResult<String>;
}
