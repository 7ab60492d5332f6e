//! Paper persistence port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Paper;

/// Local store for a fetched paper set.
#[async_trait]
pub trait PaperRepository: Send + Sync {
    /// Load the stored paper set, `None` when nothing has been stored yet.
    async fn load(&self) -> DomainResult<Option<Vec<Paper>>>;

    /// Replace the stored paper set.
    async fn save(&self, papers: &[Paper]) -> DomainResult<()>;
}
