//! Corpus ingestion: cache-or-fetch papers, chunk, embed and index.
//!
//! A persisted paired index is reused only when it was built from exactly
//! the current chunk sequence with the current embedding model. Anything
//! else is rebuilt and written back.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult, IndexError};
use crate::domain::models::{abstracts, Config, Paper};
use crate::domain::ports::{ChunkingService, EmbeddingProvider, PaperRepository, PaperSource};
use crate::services::paired_index::PairedIndex;

/// Settings the ingestion service reads from [`Config`]
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    /// Search query used when the paper cache is empty
    pub query: String,
    /// Maximum number of papers to fetch
    pub limit: usize,
    /// Chunks per embedding request
    pub embedding_batch_size: usize,
    /// Where the paired index is persisted, if anywhere
    pub index_path: Option<PathBuf>,
}

impl IngestionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            query: config.ingestion.query.clone(),
            limit: config.ingestion.limit,
            embedding_batch_size: config.embedding.batch_size,
            index_path: config.index.path.clone(),
        }
    }
}

/// How a prepared index came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// Loaded from disk and fresh for the current chunks
    Reused,
    /// Embedded and built in this run
    Built,
}

/// Result of [`IngestionService::prepare_index`]
#[derive(Debug)]
pub struct PreparedIndex {
    pub index: PairedIndex,
    pub origin: IndexOrigin,
}

/// Orchestrates the offline half of the pipeline.
pub struct IngestionService {
    source: Arc<dyn PaperSource>,
    repository: Arc<dyn PaperRepository>,
    chunker: Arc<dyn ChunkingService>,
    embedder: Arc<dyn EmbeddingProvider>,
    settings: IngestionSettings,
}

impl IngestionService {
    pub fn new(
        source: Arc<dyn PaperSource>,
        repository: Arc<dyn PaperRepository>,
        chunker: Arc<dyn ChunkingService>,
        embedder: Arc<dyn EmbeddingProvider>,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            source,
            repository,
            chunker,
            embedder,
            settings,
        }
    }

    /// Cached papers, or a fresh fetch that is then cached
    pub async fn load_or_fetch_papers(&self) -> DomainResult<Vec<Paper>> {
        if let Some(papers) = self.repository.load().await? {
            tracing::info!(papers = papers.len(), "using cached papers");
            return Ok(papers);
        }

        tracing::info!("paper cache is empty, fetching");
        self.refresh_papers(&self.settings.query, self.settings.limit)
            .await
    }

    /// Fetch papers for `query` and replace the cache with them
    pub async fn refresh_papers(&self, query: &str, limit: usize) -> DomainResult<Vec<Paper>> {
        let papers = self.source.fetch(query, limit).await?;
        self.repository.save(&papers).await?;
        tracing::info!(papers = papers.len(), query, "cached fetched papers");
        Ok(papers)
    }

    /// Chunk the current abstracts and return a paired index for them.
    ///
    /// With `force_rebuild` the persisted index is ignored.
    pub async fn prepare_index(&self, force_rebuild: bool) -> DomainResult<PreparedIndex> {
        let papers = self.load_or_fetch_papers().await?;
        let documents = abstracts(&papers);
        if documents.is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "none of the {} papers has a usable abstract",
                papers.len()
            )));
        }

        let chunks = self.chunker.chunk_documents(&documents).await?;
        tracing::info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "chunked abstracts"
        );

        if !force_rebuild {
            if let Some(index) = self.load_fresh_index(&chunks) {
                return Ok(PreparedIndex {
                    index,
                    origin: IndexOrigin::Reused,
                });
            }
        }

        let vectors = self.embed_chunks(&chunks).await?;
        let index = PairedIndex::build(self.embedder.model_name(), chunks, &vectors)?;

        if let Some(path) = &self.settings.index_path {
            index.save(path)?;
        }

        Ok(PreparedIndex {
            index,
            origin: IndexOrigin::Built,
        })
    }

    /// Embed `chunks` in batches, one vector per chunk in order
    pub async fn embed_chunks(&self, chunks: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        let batch_size = self.settings.embedding_batch_size.max(1);
        let mut vectors = Vec::with_capacity(chunks.len());

        for (batch_number, batch) in chunks.chunks(batch_size).enumerate() {
            let embedded = self.embedder.embed_batch(batch).await?;
            if embedded.len() != batch.len() {
                return Err(DomainError::EmbeddingFailed(format!(
                    "embedder returned {} vectors for {} texts",
                    embedded.len(),
                    batch.len()
                )));
            }
            tracing::debug!(batch = batch_number, size = batch.len(), "embedded batch");
            vectors.extend(embedded);
        }

        Ok(vectors)
    }

    fn load_fresh_index(&self, chunks: &[String]) -> Option<PairedIndex> {
        let path = self.settings.index_path.as_ref()?;

        match PairedIndex::load(path) {
            Ok(index) if index.is_fresh_for(chunks, self.embedder.model_name()) => {
                tracing::info!(path = %path.display(), "reusing persisted index");
                Some(index)
            }
            Ok(index) => {
                tracing::warn!(
                    path = %path.display(),
                    persisted_chunks = index.len(),
                    current_chunks = chunks.len(),
                    persisted_model = index.embedding_model(),
                    current_model = self.embedder.model_name(),
                    "persisted index is stale, rebuilding"
                );
                None
            }
            Err(IndexError::NotFound(_)) => None,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "cannot load persisted index, rebuilding");
                None
            }
        }
    }
}
