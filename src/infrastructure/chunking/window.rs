//! Sentence-aligned fixed-size chunking.

use async_trait::async_trait;

use super::sentences::{split_sentences, word_count};
use crate::domain::errors::DomainResult;
use crate::domain::ports::ChunkingService;

/// Packs whole sentences into chunks of at most `chunk_size` words.
///
/// Consecutive chunks share up to `chunk_overlap` words of trailing
/// sentences. A sentence longer than `chunk_size` is cut into word windows.
#[derive(Debug, Clone)]
pub struct SentenceWindowChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceWindowChunker {
    /// `chunk_overlap` is reduced below `chunk_size` if necessary
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Chunk a single document
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        self.pack(&split_sentences(text))
    }

    /// Pack already split sentences, preserving order
    pub fn pack(&self, sentences: &[&str]) -> Vec<String> {
        let pieces: Vec<String> = sentences
            .iter()
            .flat_map(|sentence| self.split_long(sentence))
            .collect();

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_words = 0;

        for piece in &pieces {
            let words = word_count(piece);

            if current_words + words > self.chunk_size && !current.is_empty() {
                chunks.push(current.join(" "));

                let (kept, kept_words) = self.overlap_tail(&current);
                current = kept;
                current_words = kept_words;
                if current_words + words > self.chunk_size {
                    current.clear();
                    current_words = 0;
                }
            }

            current.push(piece);
            current_words += words;
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }
        chunks
    }

    /// Trailing pieces of `current` totalling at most `chunk_overlap` words
    fn overlap_tail<'a>(&self, current: &[&'a str]) -> (Vec<&'a str>, usize) {
        let mut kept = Vec::new();
        let mut kept_words = 0;

        for piece in current.iter().rev() {
            let words = word_count(piece);
            if kept_words + words > self.chunk_overlap {
                break;
            }
            kept_words += words;
            kept.push(*piece);
        }

        kept.reverse();
        (kept, kept_words)
    }

    fn split_long(&self, sentence: &str) -> Vec<String> {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.len() <= self.chunk_size {
            return vec![sentence.to_string()];
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut windows = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(words.len());
            windows.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += step;
        }
        windows
    }
}

#[async_trait]
impl ChunkingService for SentenceWindowChunker {
    async fn chunk_documents(&self, documents: &[String]) -> DomainResult<Vec<String>> {
        Ok(documents
            .iter()
            .flat_map(|document| self.chunk_text(document))
            .collect())
    }
}
