//! Chunking adapters.

pub mod semantic;
pub mod sentences;
pub mod window;

use std::sync::Arc;

pub use semantic::SemanticChunker;
pub use window::SentenceWindowChunker;

use crate::domain::models::{ChunkingConfig, ChunkingStrategy};
use crate::domain::ports::{ChunkingService, EmbeddingProvider};

/// Build the configured chunker; the semantic strategy embeds with `embedder`
pub fn build_chunker(
    config: &ChunkingConfig,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Arc<dyn ChunkingService> {
    let window = SentenceWindowChunker::new(config.chunk_size, config.chunk_overlap);
    match config.strategy {
        ChunkingStrategy::Sentence => Arc::new(window),
        ChunkingStrategy::Semantic => Arc::new(SemanticChunker::new(
            embedder,
            config.breakpoint_percentile,
            config.buffer_size,
            window,
        )),
    }
}
