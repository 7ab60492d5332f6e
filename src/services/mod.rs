//! Service layer: the vector index, retrieval, answering and ingestion.

pub mod ingestion;
pub mod paired_index;
pub mod research_agent;
pub mod retriever;
pub mod vector_index;

#[cfg(test)]
pub(crate) mod test_support;

pub use ingestion::{IndexOrigin, IngestionService, IngestionSettings, PreparedIndex};
pub use paired_index::PairedIndex;
pub use research_agent::{build_prompt, ResearchAgent};
pub use retriever::{RetrievedChunk, Retriever};
pub use vector_index::{squared_l2, Neighbor, VectorIndex};
