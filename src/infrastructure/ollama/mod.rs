//! Ollama adapter for embeddings and answer generation.

pub mod client;
pub mod types;

pub use client::OllamaClient;
