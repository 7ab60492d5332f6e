//! Domain models

pub mod config;
pub mod paper;

pub use config::{
    CacheConfig, ChunkingConfig, ChunkingStrategy, Config, EmbeddingConfig, IndexConfig,
    IngestionConfig, LlmConfig, LogFormat, LoggingConfig, RateLimitConfig, RetrievalConfig,
    RetryConfig, RotationPolicy, SemanticScholarConfig,
};
pub use paper::{abstracts, Author, Paper};
