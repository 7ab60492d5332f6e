//! Paper acquisition port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Paper;

/// Source of paper metadata and abstracts.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Fetch up to `limit` papers matching `query`.
    async fn fetch(&self, query: &str, limit: usize) -> DomainResult<Vec<Paper>>;
}
