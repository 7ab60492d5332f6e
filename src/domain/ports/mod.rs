//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - EmbeddingProvider: text to vectors
//! - ChunkingService: documents to chunk texts
//! - LanguageModel: prompt to answer
//! - PaperSource: query to papers
//! - PaperRepository: local paper cache
//!
//! The vector index and retriever depend only on these traits, so any
//! backend can be substituted without touching retrieval logic.

pub mod chunking;
pub mod embedding;
pub mod language_model;
pub mod paper_repository;
pub mod paper_source;

pub use chunking::ChunkingService;
pub use embedding::EmbeddingProvider;
pub use language_model::LanguageModel;
pub use paper_repository::PaperRepository;
pub use paper_source::PaperSource;
