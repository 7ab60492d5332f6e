//! Query-time retrieval over a [`PairedIndex`].

use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::DomainResult;
use crate::domain::ports::EmbeddingProvider;
use crate::services::paired_index::PairedIndex;

/// A retrieved chunk together with its search metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    /// Position of the chunk in the index
    pub position: usize,
    /// Squared L2 distance to the query vector
    pub distance: f32,
    /// Chunk text
    pub text: String,
}

/// Embeds queries and maps their nearest neighbors back to chunk text.
///
/// The index is shared read-only; nothing here mutates it.
pub struct Retriever {
    index: Arc<PairedIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    default_top_k: usize,
}

impl Retriever {
    /// Create a retriever.
    ///
    /// # Arguments
    /// * `index` - Paired index to search
    /// * `embedder` - Must be the model the index was built with
    /// * `default_top_k` - Used by callers that do not choose `k` themselves
    pub fn new(
        index: Arc<PairedIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        default_top_k: usize,
    ) -> Self {
        if embedder.model_name() != index.embedding_model() {
            tracing::warn!(
                index_model = index.embedding_model(),
                embedder_model = embedder.model_name(),
                "query embedder differs from the model the index was built with"
            );
        }

        Self {
            index,
            embedder,
            default_top_k,
        }
    }

    /// Configured default for `top_k`
    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    /// The underlying paired index
    pub fn index(&self) -> &PairedIndex {
        &self.index
    }

    /// Nearest chunks to `query`, nearest first.
    ///
    /// `top_k` of `None` uses the configured default. Zero is rejected and
    /// values above the chunk count are clamped.
    pub async fn retrieve_chunks(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> DomainResult<Vec<RetrievedChunk>> {
        let k = top_k.unwrap_or(self.default_top_k);

        let query_vector = self.embedder.embed(query).await?;
        let neighbors = self.index.search(&query_vector, k)?;

        let chunks = neighbors
            .into_iter()
            .map(|neighbor| {
                let text = self.index.chunk(neighbor.position)?;
                Ok(RetrievedChunk {
                    position: neighbor.position,
                    distance: neighbor.distance,
                    text: text.to_string(),
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        tracing::debug!(k, returned = chunks.len(), "retrieved chunks");
        Ok(chunks)
    }

    /// Nearest chunks to `query` joined with a single space into one context string
    pub async fn retrieve(&self, query: &str, top_k: Option<usize>) -> DomainResult<String> {
        let chunks = self.retrieve_chunks(query, top_k).await?;
        Ok(join_context(&chunks))
    }
}

fn join_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
