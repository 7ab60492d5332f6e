//! Vector index paired with the chunk texts it was built from.
//!
//! Position `i` in the vector index is the embedding of `chunks[i]`. Both
//! halves are only ever mutated together and are persisted as one file, so
//! a persisted index can never be paired with a different chunk sequence.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult, IndexError};
use crate::services::vector_index::{write_atomic, IndexResult, Neighbor, VectorIndex};

/// Version of the on-disk layout
pub const FORMAT_VERSION: u32 = 1;

/// A vector index that owns its chunk sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairedIndex {
    format_version: u32,
    embedding_model: String,
    built_at: DateTime<Utc>,
    index: VectorIndex,
    chunks: Vec<String>,
}

impl PairedIndex {
    /// Create an empty paired index for vectors produced by `embedding_model`
    pub fn new(embedding_model: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            embedding_model: embedding_model.into(),
            built_at: Utc::now(),
            index: VectorIndex::new(),
            chunks: Vec::new(),
        }
    }

    /// Build a paired index from chunks and their embeddings, in the same order
    pub fn build(
        embedding_model: impl Into<String>,
        chunks: Vec<String>,
        vectors: &[Vec<f32>],
    ) -> IndexResult<Self> {
        ensure_same_count(chunks.len(), vectors.len())?;

        let mut paired = Self::new(embedding_model);
        paired.index.build(vectors)?;
        paired.chunks = chunks;

        tracing::info!(
            chunks = paired.chunks.len(),
            model = %paired.embedding_model,
            "built paired index"
        );
        Ok(paired)
    }

    /// Append chunks and their embeddings
    pub fn append(&mut self, chunks: Vec<String>, vectors: &[Vec<f32>]) -> IndexResult<()> {
        ensure_same_count(chunks.len(), vectors.len())?;
        self.index.append(vectors)?;
        self.chunks.extend(chunks);
        Ok(())
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Vector dimensionality, once established
    pub fn dimension(&self) -> Option<usize> {
        self.index.dimension()
    }

    /// Embedding model the vectors were produced with
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// When the index was built
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// All chunk texts, in index order
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Nearest stored vectors to `query`
    pub fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<Neighbor>> {
        self.index.search(query, k)
    }

    /// The chunk at `position`.
    ///
    /// A missing chunk means the vector index and the chunk sequence have
    /// diverged, which is reported as `IndexOutOfRange`.
    pub fn chunk(&self, position: usize) -> DomainResult<&str> {
        self.chunks.get(position).map(String::as_str).ok_or_else(|| {
            tracing::error!(
                position,
                chunk_count = self.chunks.len(),
                "search returned a position with no chunk"
            );
            DomainError::IndexOutOfRange {
                position,
                chunk_count: self.chunks.len(),
            }
        })
    }

    /// True when this index was built from exactly `chunks` with `embedding_model`
    pub fn is_fresh_for(&self, chunks: &[String], embedding_model: &str) -> bool {
        self.embedding_model == embedding_model && self.chunks == chunks
    }

    /// Persist vectors and chunks together, replacing any existing file
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let bytes = serde_json::to_vec(self)?;
        write_atomic(path, &bytes)?;
        tracing::info!(path = %path.display(), chunks = self.len(), "saved paired index");
        Ok(())
    }

    /// Load a paired index written by [`PairedIndex::save`]
    pub fn load(path: &Path) -> IndexResult<Self> {
        if !path.exists() {
            return Err(IndexError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path)?;
        let paired: Self = serde_json::from_slice(&bytes)?;

        if paired.format_version != FORMAT_VERSION {
            return Err(IndexError::Corrupt(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                paired.format_version
            )));
        }
        paired.index.validate()?;
        ensure_same_count(paired.chunks.len(), paired.index.len())?;

        tracing::info!(
            path = %path.display(),
            chunks = paired.len(),
            model = %paired.embedding_model,
            built_at = %paired.built_at,
            "loaded paired index"
        );
        Ok(paired)
    }
}

fn ensure_same_count(chunks: usize, vectors: usize) -> IndexResult<()> {
    if chunks == vectors {
        Ok(())
    } else {
        Err(IndexError::CountMismatch { chunks, vectors })
    }
}
