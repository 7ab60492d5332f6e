//! Semantic Scholar paper source.

pub mod client;
pub mod types;

pub use client::SemanticScholarClient;
