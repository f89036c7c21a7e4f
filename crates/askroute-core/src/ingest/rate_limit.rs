//! Rate limiting for external embedding calls
//!
//! Token bucket pacing between ingestion batches. The limiter is
//! injected so tests can substitute `Unlimited` and run without delays.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Pacing policy consulted before each ingestion batch
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next request is allowed
    async fn acquire(&self);
}

/// Configuration for the token bucket
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: f64,
    /// Requests that can be made instantly from a full bucket
    pub burst_size: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 0.5,
            burst_size: 1,
        }
    }
}

struct BucketState {
    tokens: f64,
    last_update: Instant,
}

/// Token bucket rate limiter
pub struct TokenBucket {
    config: RateLimitConfig,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(BucketState {
                tokens: config.burst_size as f64,
                last_update: Instant::now(),
            }),
        }
    }

    /// Take a token if available, otherwise report how long until one
    /// accrues
    fn try_take(&self) -> Option<Duration> {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());

        let now = Instant::now();
        let elapsed = now.duration_since(state.last_update).as_secs_f64();
        state.last_update = now;
        state.tokens = (state.tokens + elapsed * self.config.requests_per_second)
            .min(self.config.burst_size as f64);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            None
        } else {
            let needed = 1.0 - state.tokens;
            let wait = needed / self.config.requests_per_second;
            Some(Duration::from_secs_f64(wait))
        }
    }
}

#[async_trait]
impl RateLimiter for TokenBucket {
    async fn acquire(&self) {
        loop {
            match self.try_take() {
                None => return,
                Some(wait) => tokio::time::sleep(wait).await,
            }
        }
    }
}

/// No-op limiter for tests and offline runs
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_starts_full() {
        let bucket = TokenBucket::new(RateLimitConfig {
            requests_per_second: 1.0,
            burst_size: 3,
        });

        assert!(bucket.try_take().is_none());
        assert!(bucket.try_take().is_none());
        assert!(bucket.try_take().is_none());
        assert!(bucket.try_take().is_some());
    }

    #[test]
    fn test_empty_bucket_reports_wait() {
        let bucket = TokenBucket::new(RateLimitConfig {
            requests_per_second: 0.5,
            burst_size: 1,
        });

        assert!(bucket.try_take().is_none());
        let wait = bucket.try_take().expect("bucket should be empty");
        assert!(wait > Duration::from_millis(1500));
        assert!(wait <= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_bucket_refills() {
        let bucket = TokenBucket::new(RateLimitConfig {
            requests_per_second: 100.0,
            burst_size: 1,
        });

        bucket.acquire().await;
        // One token per 10ms at this rate; the second acquire waits
        let start = Instant::now();
        bucket.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let limiter = Unlimited;
        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
