//! Infrastructure layer module
//!
//! Adapters for the domain ports plus process-level plumbing:
//! - Semantic Scholar paper search client
//! - JSON paper cache
//! - Sentence-window and semantic chunkers
//! - Ollama embedding and generation client
//! - Shared HTTP retry and rate limiting
//! - Configuration management
//! - Logging infrastructure

pub mod cache;
pub mod chunking;
pub mod config;
pub mod http;
pub mod logging;
pub mod ollama;
pub mod scholar;
