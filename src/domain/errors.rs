//! Domain errors for the scholar-rag pipeline.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by the vector index and the paired chunk index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector index is not initialized: no vectors have been stored")]
    NotInitialized,

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Cannot index a zero-length vector")]
    EmptyVector,

    #[error("Non-finite value at component {component} of vector {position:?}")]
    NonFiniteComponent {
        /// Batch position of the offending vector; `None` for a query
        position: Option<usize>,
        /// Index of the first non-finite component
        component: usize,
    },

    #[error("Chunk/vector count mismatch: {chunks} chunks but {vectors} vectors")]
    CountMismatch { chunks: usize, vectors: usize },

    #[error("Persisted index not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Persisted index is corrupt: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Domain-level errors that can occur anywhere in the query or ingestion path.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(
        "Index/chunk alignment violated: search returned position {position} but only {chunk_count} chunks are stored"
    )]
    IndexOutOfRange { position: usize, chunk_count: usize },

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Generation timed out after {0:?}")]
    GenerationTimeout(Duration),

    #[error("Chunking failed: {0}")]
    ChunkingFailed(String),

    #[error("Paper source error: {0}")]
    SourceFailed(String),

    #[error("Paper cache error: {0}")]
    CacheFailed(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl DomainError {
    /// Returns true for failures that indicate corrupted internal state
    /// rather than a transient collaborator problem.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::Index(IndexError::CountMismatch { .. } | IndexError::Corrupt(_))
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
