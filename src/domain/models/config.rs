use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for scholar-rag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Paper search API configuration
    #[serde(default)]
    pub semantic_scholar: SemanticScholarConfig,

    /// What to fetch when the paper cache is empty
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// Paper cache location
    #[serde(default)]
    pub cache: CacheConfig,

    /// Chunking strategy and sizes
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Persisted index location
    #[serde(default)]
    pub index: IndexConfig,

    /// Retrieval defaults
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Generative model configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Rate limiting configuration for the paper search API
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Semantic Scholar search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SemanticScholarConfig {
    /// Paper search endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Optional API key sent as `x-api-key`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Papers requested per page (the API caps this at 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.semanticscholar.org/graph/v1/paper/search".to_string()
}

const fn default_page_size() -> usize {
    100
}

const fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for SemanticScholarConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            page_size: default_page_size(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestionConfig {
    /// Search query used to populate the corpus
    #[serde(default = "default_query")]
    pub query: String,

    /// Maximum number of papers to fetch
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_query() -> String {
    "machine learning software engineering".to_string()
}

const fn default_limit() -> usize {
    100
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            limit: default_limit(),
        }
    }
}

/// Paper cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Path of the cached paper set
    #[serde(default = "default_papers_path")]
    pub papers_path: String,
}

fn default_papers_path() -> String {
    "data/papers.json".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            papers_path: default_papers_path(),
        }
    }
}

/// How documents are split into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    /// Break where adjacent sentence embeddings diverge
    Semantic,
    /// Fixed-size sentence windows with overlap
    Sentence,
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Chunking strategy
    #[serde(default = "default_strategy")]
    pub strategy: ChunkingStrategy,

    /// Maximum chunk size in words
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in words
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Percentile of adjacent-sentence distances above which a semantic break is made
    #[serde(default = "default_breakpoint_percentile")]
    pub breakpoint_percentile: f64,

    /// Neighbouring sentences embedded together with each sentence
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

const fn default_strategy() -> ChunkingStrategy {
    ChunkingStrategy::Semantic
}

const fn default_chunk_size() -> usize {
    512
}

const fn default_chunk_overlap() -> usize {
    50
}

const fn default_breakpoint_percentile() -> f64 {
    95.0
}

const fn default_buffer_size() -> usize {
    1
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            breakpoint_percentile: default_breakpoint_percentile(),
            buffer_size: default_buffer_size(),
        }
    }
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Embedding model identifier; recorded in the persisted index
    #[serde(default = "default_embedding_model")]
    pub model_name: String,

    /// Ollama server URL serving the embedding model
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Texts sent per embedding request
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

const fn default_embedding_batch_size() -> usize {
    64
}

const fn default_embedding_timeout_secs() -> u64 {
    60
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_embedding_model(),
            base_url: default_ollama_url(),
            batch_size: default_embedding_batch_size(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

/// Persisted index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexConfig {
    /// Where the paired index is persisted; `None` keeps it in memory only
    #[serde(default = "default_index_path")]
    pub path: Option<PathBuf>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_index_path() -> Option<PathBuf> {
    Some(PathBuf::from("data/index.json"))
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

const fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Generative model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// Ollama server URL
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Model tag
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Upper bound on a single answer generation, in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_model() -> String {
    "llama3.2:latest".to_string()
}

const fn default_llm_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_llm_model(),
            temperature: 0.0,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Burst size for token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

const fn default_requests_per_second() -> f64 {
    1.0
}

const fn default_burst_size() -> u32 {
    1
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Directory for log files (if None logs only to stderr)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "warn".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
