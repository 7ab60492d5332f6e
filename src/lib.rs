//! scholar-rag: retrieval-augmented question answering over paper abstracts
//!
//! Abstracts are fetched from Semantic Scholar, chunked, embedded and held
//! in an exact nearest-neighbour index. Queries are answered by a local
//! language model using the nearest chunks as context.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): errors, models and the port traits
//! - **Service Layer** (`services`): vector index, retrieval, answering, ingestion
//! - **Infrastructure Layer** (`infrastructure`): HTTP adapters, cache, chunkers, config, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use scholar_rag::services::PairedIndex;
//!
//! let index = PairedIndex::build(
//!     "example-model",
//!     vec!["A".to_string(), "B".to_string()],
//!     &[vec![1.0, 0.0], vec![0.0, 1.0]],
//! )
//! .unwrap();
//! let nearest = index.search(&[0.9, 0.1], 1).unwrap();
//! assert_eq!(index.chunk(nearest[0].position).unwrap(), "A");
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::Config;
pub use domain::{DomainError, DomainResult, IndexError};
pub use infrastructure::config::ConfigLoader;
pub use services::{PairedIndex, ResearchAgent, Retriever, VectorIndex};
