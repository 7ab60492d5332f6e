//! Question answering over retrieved context.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::LanguageModel;
use crate::services::retriever::Retriever;

/// Compose the generation prompt from retrieved context and the user query
pub fn build_prompt(context: &str, query: &str) -> String {
    format!("Use the following context to answer the query:\n{context}\n\nQuery: {query}\nAnswer:")
}

/// Retrieves context for a query and asks the language model to answer it.
pub struct ResearchAgent {
    retriever: Arc<Retriever>,
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl ResearchAgent {
    pub fn new(retriever: Arc<Retriever>, model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self {
            retriever,
            model,
            timeout,
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `query` using the retriever's default `top_k`.
    ///
    /// The answer is returned exactly as the model produced it.
    pub async fn answer(&self, query: &str) -> DomainResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::ValidationFailed(
                "query must not be empty".to_string(),
            ));
        }

        let context = self.retriever.retrieve(query, None).await?;
        self.answer_with_context(&context, query).await
    }

    /// Answer `query` against an already retrieved context string
    pub async fn answer_with_context(&self, context: &str, query: &str) -> DomainResult<String> {
        let prompt = build_prompt(context, query);
        tracing::debug!(
            model = self.model.model_name(),
            prompt_chars = prompt.len(),
            "generating answer"
        );

        match tokio::time::timeout(self.timeout, self.model.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "generation timed out");
                Err(DomainError::GenerationTimeout(self.timeout))
            }
        }
    }
}
