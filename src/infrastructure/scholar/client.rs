//! Semantic Scholar paper search client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{SearchPage, PAPER_FIELDS};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Paper, SemanticScholarConfig};
use crate::domain::ports::PaperSource;
use crate::infrastructure::http::{ApiError, RetryPolicy, TokenBucketRateLimiter};

/// Largest page the search endpoint serves
pub const MAX_PAGE_SIZE: usize = 100;

/// Paginating client for the paper search endpoint
pub struct SemanticScholarClient {
    http_client: Client,
    api_url: String,
    api_key: Option<String>,
    page_size: usize,
    rate_limiter: TokenBucketRateLimiter,
    retry_policy: RetryPolicy,
}

impl SemanticScholarClient {
    pub fn new(
        config: &SemanticScholarConfig,
        rate_limiter: TokenBucketRateLimiter,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size.clamp(1, MAX_PAGE_SIZE),
            rate_limiter,
            retry_policy,
        })
    }

    /// Fetch a single page
    pub async fn search_page(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage, ApiError> {
        self.retry_policy
            .execute(|| async move {
                self.rate_limiter.acquire().await;
                self.request_page(query, offset, limit).await
            })
            .await
    }

    async fn request_page(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage, ApiError> {
        let mut request = self.http_client.get(&self.api_url).query(&[
            ("query", query),
            ("offset", &offset.to_string()),
            ("limit", &limit.to_string()),
            ("fields", PAPER_FIELDS),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(ApiError::from_status(status, body));
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaperSource for SemanticScholarClient {
    async fn fetch(&self, query: &str, limit: usize) -> DomainResult<Vec<Paper>> {
        let mut papers: Vec<Paper> = Vec::with_capacity(limit);
        let mut offset = 0;

        while papers.len() < limit {
            let requested = self.page_size.min(limit - papers.len());
            let page = self
                .search_page(query, offset, requested)
                .await
                .map_err(|e| DomainError::SourceFailed(e.to_string()))?;

            let received = page.data.len();
            tracing::info!(offset, received, total = ?page.total, "fetched papers page");
            papers.extend(page.data);

            if received < requested {
                break;
            }
            match page.next {
                Some(next) if next > offset => offset = next,
                Some(_) => break,
                None if page.total.is_some_and(|total| offset + received < total) => {
                    offset += received;
                }
                None => break,
            }
        }

        papers.truncate(limit);
        Ok(papers)
    }
}
