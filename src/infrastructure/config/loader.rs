use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Default project configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Optional untracked overrides
pub const LOCAL_CONFIG_PATH: &str = "config/local.yaml";

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "SCHOLAR_RAG_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("{0} must be greater than 0")]
    ZeroValue(&'static str),

    #[error("Invalid page_size: {0}. Must be between 1 and 100")]
    InvalidPageSize(usize),

    #[error("Invalid chunk_overlap: {overlap}. Must be less than chunk_size ({size})")]
    InvalidChunkOverlap { overlap: usize, size: usize },

    #[error("Invalid breakpoint_percentile: {0}. Must be in (0, 100]")]
    InvalidPercentile(f64),

    #[error("Invalid temperature: {0}. Must be between 0 and 2")]
    InvalidTemperature(f32),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `config_path`, or `config/config.yaml` when none is given
    /// 3. `config/local.yaml` (optional)
    /// 4. `SCHOLAR_RAG_*` environment variables
    pub fn load(config_path: Option<&Path>) -> Result<Config> {
        let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        if config_path.is_some() && !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Self::figment(path)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Provider chain used by [`ConfigLoader::load`]
    pub fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(config_path))
            .merge(Yaml::file(LOCAL_CONFIG_PATH))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let s2 = &config.semantic_scholar;
        if s2.api_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue("semantic_scholar.api_url"));
        }
        if s2.page_size == 0 || s2.page_size > 100 {
            return Err(ConfigError::InvalidPageSize(s2.page_size));
        }
        if s2.timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("semantic_scholar.timeout_secs"));
        }

        if config.ingestion.query.trim().is_empty() {
            return Err(ConfigError::EmptyValue("ingestion.query"));
        }
        if config.ingestion.limit == 0 {
            return Err(ConfigError::ZeroValue("ingestion.limit"));
        }

        if config.cache.papers_path.trim().is_empty() {
            return Err(ConfigError::EmptyValue("cache.papers_path"));
        }

        let chunking = &config.chunking;
        if chunking.chunk_size == 0 {
            return Err(ConfigError::ZeroValue("chunking.chunk_size"));
        }
        if chunking.chunk_overlap >= chunking.chunk_size {
            return Err(ConfigError::InvalidChunkOverlap {
                overlap: chunking.chunk_overlap,
                size: chunking.chunk_size,
            });
        }
        if !(chunking.breakpoint_percentile > 0.0 && chunking.breakpoint_percentile <= 100.0) {
            return Err(ConfigError::InvalidPercentile(
                chunking.breakpoint_percentile,
            ));
        }

        let embedding = &config.embedding;
        if embedding.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyValue("embedding.model_name"));
        }
        if embedding.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue("embedding.base_url"));
        }
        if embedding.batch_size == 0 {
            return Err(ConfigError::ZeroValue("embedding.batch_size"));
        }
        if embedding.timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("embedding.timeout_secs"));
        }

        if config
            .index
            .path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyValue("index.path"));
        }

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::ZeroValue("retrieval.top_k"));
        }

        let llm = &config.llm;
        if llm.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue("llm.base_url"));
        }
        if llm.model.trim().is_empty() {
            return Err(ConfigError::EmptyValue("llm.model"));
        }
        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigError::InvalidTemperature(llm.temperature));
        }
        if llm.timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("llm.timeout_secs"));
        }

        let rps = config.rate_limit.requests_per_second;
        if !(rps > 0.0 && rps.is_finite()) {
            return Err(ConfigError::InvalidRateLimit(
                config.rate_limit.requests_per_second,
            ));
        }
        if config.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(config.rate_limit.burst_size));
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }
        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
