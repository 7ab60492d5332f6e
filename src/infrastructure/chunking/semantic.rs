//! Embedding-breakpoint chunking.
//!
//! Each sentence is embedded together with `buffer_size` neighbours on either
//! side. A chunk boundary is placed after sentence `i` when the cosine
//! distance between group `i` and group `i + 1` is above the configured
//! percentile of all adjacent distances in the document. Resulting groups are
//! then packed by [`SentenceWindowChunker`] so no chunk exceeds the size cap.

use std::sync::Arc;

use async_trait::async_trait;

use super::sentences::split_sentences;
use super::window::SentenceWindowChunker;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{ChunkingService, EmbeddingProvider};

pub struct SemanticChunker {
    embedder: Arc<dyn EmbeddingProvider>,
    breakpoint_percentile: f64,
    buffer_size: usize,
    window: SentenceWindowChunker,
}

impl SemanticChunker {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        breakpoint_percentile: f64,
        buffer_size: usize,
        window: SentenceWindowChunker,
    ) -> Self {
        Self {
            embedder,
            breakpoint_percentile,
            buffer_size,
            window,
        }
    }

    async fn chunk_text(&self, text: &str) -> DomainResult<Vec<String>> {
        let sentences = split_sentences(text);
        if sentences.len() < 2 {
            return Ok(self.window.pack(&sentences));
        }

        let groups = buffered_groups(&sentences, self.buffer_size);
        let embeddings = self.embedder.embed_batch(&groups).await?;
        if embeddings.len() != groups.len() {
            return Err(DomainError::ChunkingFailed(format!(
                "expected {} sentence embeddings, got {}",
                groups.len(),
                embeddings.len()
            )));
        }

        let distances: Vec<f64> = embeddings
            .windows(2)
            .map(|pair| cosine_distance(&pair[0], &pair[1]))
            .collect();
        let threshold = percentile(&distances, self.breakpoint_percentile);

        let mut chunks = Vec::new();
        let mut start = 0;
        for (i, distance) in distances.iter().enumerate() {
            if *distance > threshold {
                chunks.extend(self.window.pack(&sentences[start..=i]));
                start = i + 1;
            }
        }
        chunks.extend(self.window.pack(&sentences[start..]));

        Ok(chunks)
    }
}

#[async_trait]
impl ChunkingService for SemanticChunker {
    async fn chunk_documents(&self, documents: &[String]) -> DomainResult<Vec<String>> {
        let mut chunks = Vec::new();
        for (i, document) in documents.iter().enumerate() {
            let document_chunks = self.chunk_text(document).await?;
            tracing::trace!(document = i, chunks = document_chunks.len(), "chunked document");
            chunks.extend(document_chunks);
        }
        Ok(chunks)
    }
}

/// Sentence `i` joined with up to `buffer` sentences on each side
fn buffered_groups(sentences: &[&str], buffer: usize) -> Vec<String> {
    (0..sentences.len())
        .map(|i| {
            let start = i.saturating_sub(buffer);
            let end = (i + buffer + 1).min(sentences.len());
            sentences[start..end].join(" ")
        })
        .collect()
}

/// 1 - cosine similarity; a zero vector is treated as dissimilar to everything
fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Linearly interpolated percentile, `p` in [0, 100]
fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return f64::INFINITY;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
