//! Wiring of adapters and services from a loaded [`Config`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::output::create_spinner;
use crate::domain::models::Config;
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::cache::PaperCache;
use crate::infrastructure::chunking::build_chunker;
use crate::infrastructure::http::{RetryPolicy, TokenBucketRateLimiter};
use crate::infrastructure::ollama::OllamaClient;
use crate::infrastructure::scholar::SemanticScholarClient;
use crate::services::{
    IndexOrigin, IngestionService, IngestionSettings, PreparedIndex, ResearchAgent, Retriever,
};

/// Ingestion service backed by the real adapters, plus the embedder it uses
pub fn ingestion_service(config: &Config) -> Result<(IngestionService, Arc<dyn EmbeddingProvider>)> {
    let retry = RetryPolicy::from_config(&config.retry);

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        OllamaClient::embedder(&config.embedding, retry.clone())
            .context("Failed to create embedding client")?,
    );
    let source = Arc::new(
        SemanticScholarClient::new(
            &config.semantic_scholar,
            TokenBucketRateLimiter::from_config(&config.rate_limit),
            retry,
        )
        .context("Failed to create Semantic Scholar client")?,
    );
    let cache = Arc::new(PaperCache::new(&config.cache.papers_path));
    let chunker = build_chunker(&config.chunking, embedder.clone());

    let service = IngestionService::new(
        source,
        cache,
        chunker,
        embedder.clone(),
        IngestionSettings::from_config(config),
    );
    Ok((service, embedder))
}

/// Load or build the paired index, with a spinner unless `quiet`
pub async fn prepare_index(
    config: &Config,
    force_rebuild: bool,
    quiet: bool,
) -> Result<(PreparedIndex, Arc<dyn EmbeddingProvider>)> {
    let (service, embedder) = ingestion_service(config)?;

    let spinner = create_spinner("Preparing vector index...", quiet);
    let prepared = service.prepare_index(force_rebuild).await;
    spinner.finish_and_clear();

    let prepared = prepared.context("Failed to prepare the vector index")?;
    tracing::info!(
        chunks = prepared.index.len(),
        reused = prepared.origin == IndexOrigin::Reused,
        "index ready"
    );
    Ok((prepared, embedder))
}

/// Retriever over the prepared index
pub async fn build_retriever(config: &Config, quiet: bool) -> Result<Retriever> {
    let (prepared, embedder) = prepare_index(config, false, quiet).await?;
    Ok(Retriever::new(
        Arc::new(prepared.index),
        embedder,
        config.retrieval.top_k,
    ))
}

/// Research agent over the prepared index and the configured language model
pub async fn build_agent(config: &Config, quiet: bool) -> Result<ResearchAgent> {
    let retriever = build_retriever(config, quiet).await?;
    let model = OllamaClient::generator(&config.llm, RetryPolicy::from_config(&config.retry))
        .context("Failed to create language model client")?;

    Ok(ResearchAgent::new(
        Arc::new(retriever),
        Arc::new(model),
        Duration::from_secs(config.llm.timeout_secs),
    ))
}

/// Display form of the configured index location
pub fn index_location(config: &Config) -> String {
    config
        .index
        .path
        .as_deref()
        .map_or_else(|| "(in memory)".to_string(), |p: &Path| p.display().to_string())
}
