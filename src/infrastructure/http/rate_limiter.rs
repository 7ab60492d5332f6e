use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::domain::models::RateLimitConfig;

/// Token bucket rate limiter for outgoing API requests
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    tokens: Arc<Mutex<f64>>,
    capacity: f64,
    refill_rate: f64,
    last_refill: Arc<Mutex<Instant>>,
}

impl TokenBucketRateLimiter {
    /// Create a limiter whose burst capacity equals its per-second rate
    ///
    /// # Arguments
    /// * `rate_limit_rps` - Requests per second allowed, must be positive
    pub fn new(rate_limit_rps: f64) -> Self {
        Self::with_burst(rate_limit_rps, rate_limit_rps)
    }

    /// Create a limiter refilling at `rate_limit_rps` with room for `burst` requests
    pub fn with_burst(rate_limit_rps: f64, burst: f64) -> Self {
        assert!(rate_limit_rps > 0.0, "Rate limit must be positive");
        let capacity = burst.max(1.0);

        Self {
            tokens: Arc::new(Mutex::new(capacity)),
            capacity,
            refill_rate: rate_limit_rps,
            last_refill: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::with_burst(config.requests_per_second, f64::from(config.burst_size))
    }

    /// Wait until a token is available, then consume it
    pub async fn acquire(&self) {
        loop {
            let mut tokens = self.tokens.lock().await;
            let mut last_refill = self.last_refill.lock().await;

            let now = Instant::now();
            let elapsed = now.duration_since(*last_refill).as_secs_f64();
            let available = (*tokens + elapsed * self.refill_rate).min(self.capacity);

            if available >= 1.0 {
                *tokens = available - 1.0;
                *last_refill = now;
                break;
            }

            let wait_secs = (1.0 - available) / self.refill_rate;
            let wait = Duration::from_secs_f64(wait_secs.max(0.01));

            // release before sleeping so other callers can refill
            drop(tokens);
            drop(last_refill);

            tracing::trace!(?wait, "rate limited");
            sleep(wait).await;
        }
    }

    #[cfg(test)]
    async fn available_tokens(&self) -> f64 {
        let tokens = self.tokens.lock().await;
        let last_refill = self.last_refill.lock().await;
        let elapsed = Instant::now().duration_since(*last_refill).as_secs_f64();
        (*tokens + elapsed * self.refill_rate).min(self.capacity)
    }
}
