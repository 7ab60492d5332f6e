//! JSON file cache of the fetched paper set.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Paper;
use crate::domain::ports::PaperRepository;

/// Paper set stored as a JSON array at a fixed path
pub struct PaperCache {
    path: PathBuf,
}

impl PaperCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PaperRepository for PaperCache {
    async fn load(&self) -> DomainResult<Option<Vec<Paper>>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::CacheFailed(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let papers: Vec<Paper> = serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::CacheFailed(format!("cannot parse {}: {e}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), papers = papers.len(), "loaded paper cache");
        Ok(Some(papers))
    }

    async fn save(&self, papers: &[Paper]) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::CacheFailed(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(papers)
            .map_err(|e| DomainError::CacheFailed(e.to_string()))?;
        fs::write(&self.path, json).await.map_err(|e| {
            DomainError::CacheFailed(format!("cannot write {}: {e}", self.path.display()))
        })?;

        tracing::info!(path = %self.path.display(), papers = papers.len(), "saved paper cache");
        Ok(())
    }
}
