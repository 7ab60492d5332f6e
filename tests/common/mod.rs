//! Common test utilities for integration tests
//!
//! Provides a deterministic embedder and sample API payloads shared across
//! integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use scholar_rag::domain::errors::DomainResult;
use scholar_rag::domain::ports::EmbeddingProvider;
use scholar_rag::infrastructure::http::{RetryPolicy, TokenBucketRateLimiter};
use serde_json::{json, Value};

/// Dimensionality of [`HashingEmbedder`] vectors
pub const HASH_DIM: usize = 64;

/// Bag-of-words embedder: each lowercase word is hashed into one of
/// `HASH_DIM` buckets and the counts are normalized to unit length.
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; HASH_DIM];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[fnv1a(&word.to_lowercase())] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

fn fnv1a(word: &str) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % HASH_DIM as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model_name(&self) -> &str {
        "hashing-test"
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// Retry policy with millisecond backoff so retry tests stay fast
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(2, 5, 20)
}

/// A limiter that never delays in tests
pub fn no_rate_limit() -> TokenBucketRateLimiter {
    TokenBucketRateLimiter::new(1_000.0)
}

/// A paper search API record
pub fn paper_json(id: &str, abstract_text: Option<&str>) -> Value {
    json!({
        "paperId": id,
        "title": format!("Paper {id}"),
        "abstract": abstract_text,
        "authors": [{"authorId": "1", "name": "A. Author"}],
        "url": format!("https://www.semanticscholar.org/paper/{id}")
    })
}

/// A search results page
pub fn search_page(offset: usize, next: Option<usize>, papers: Vec<Value>) -> String {
    let mut page = json!({
        "total": 1000,
        "offset": offset,
        "data": papers,
    });
    if let Some(next) = next {
        page["next"] = json!(next);
    }
    page.to_string()
}
