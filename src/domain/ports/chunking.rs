//! Chunking port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Splits a batch of documents into a flat, ordered list of chunk texts.
///
/// Output order must be stable within a run: chunks of document `i` come
/// before chunks of document `i + 1`, in reading order.
#[async_trait]
pub trait ChunkingService: Send + Sync {
    /// Chunk every document and concatenate the results.
    async fn chunk_documents(&self, documents: &[String]) -> DomainResult<Vec<String>>;
}
