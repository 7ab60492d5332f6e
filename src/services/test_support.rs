//! In-memory port implementations shared by the service unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Paper;
use crate::domain::ports::{
    ChunkingService, EmbeddingProvider, LanguageModel, PaperRepository, PaperSource,
};

/// Embedder backed by a fixed text-to-vector table
pub struct TableEmbedder {
    model: String,
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new(model: &str, entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            model: model.to_string(),
            table: entries
                .iter()
                .map(|(text, vector)| ((*text).to_string(), vector.clone()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        texts
            .iter()
            .map(|text| {
                self.table
                    .get(text)
                    .cloned()
                    .ok_or_else(|| DomainError::EmbeddingFailed(format!("no vector for {text:?}")))
            })
            .collect()
    }
}

/// Language model that echoes a canned answer and records prompts
pub struct CannedModel {
    answer: String,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl CannedModel {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(answer: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(answer)
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for CannedModel {
    fn model_name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, prompt: &str) -> DomainResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.answer.clone())
    }
}

/// Chunker that treats every document as a single chunk
pub struct IdentityChunker;

#[async_trait]
impl ChunkingService for IdentityChunker {
    async fn chunk_documents(&self, documents: &[String]) -> DomainResult<Vec<String>> {
        Ok(documents.to_vec())
    }
}

/// Paper source returning a fixed list and counting calls
pub struct FixedSource {
    papers: Vec<Paper>,
    calls: AtomicUsize,
}

impl FixedSource {
    pub fn new(papers: Vec<Paper>) -> Self {
        Self {
            papers,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaperSource for FixedSource {
    async fn fetch(&self, _query: &str, limit: usize) -> DomainResult<Vec<Paper>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.papers.iter().take(limit).cloned().collect())
    }
}

pub fn paper(id: &str, abstract_text: Option<&str>) -> Paper {
    Paper {
        paper_id: id.to_string(),
        title: format!("Paper {id}"),
        abstract_text: abstract_text.map(str::to_string),
        authors: Vec::new(),
        url: None,
    }
}

/// Paper repository held in memory
#[derive(Default)]
pub struct MemoryRepository {
    papers: Mutex<Option<Vec<Paper>>>,
}

impl MemoryRepository {
    pub fn with_papers(papers: Vec<Paper>) -> Self {
        Self {
            papers: Mutex::new(Some(papers)),
        }
    }

    pub fn stored(&self) -> Option<Vec<Paper>> {
        self.papers.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaperRepository for MemoryRepository {
    async fn load(&self) -> DomainResult<Option<Vec<Paper>>> {
        Ok(self.papers.lock().unwrap().clone())
    }

    async fn save(&self, papers: &[Paper]) -> DomainResult<()> {
        *self.papers.lock().unwrap() = Some(papers.to_vec());
        Ok(())
    }
}
