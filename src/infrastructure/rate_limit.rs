//! Per-client sliding window rate limiting

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Outcome of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    pub limit: u32,
    /// Seconds until the oldest counted request leaves the window
    pub reset_in_seconds: u64,
}

/// Sliding window limiter keyed by client address
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    records: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    cleanup_interval: Duration,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            records: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Count this request against `client` if it fits in the window
    pub async fn check_and_record(&self, client: &str) -> RateLimitDecision {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let window_start = now.checked_sub(self.window).unwrap_or(now);

        let mut records = self.records.write().await;
        let client_records = records.entry(client.to_string()).or_default();
        client_records.retain(|t| *t > window_start);

        let count = client_records.len() as u32;

        if count >= self.max_requests {
            let reset_in_seconds = client_records
                .first()
                .map(|oldest| {
                    self.window
                        .saturating_sub(now.duration_since(*oldest))
                        .as_secs()
                })
                .unwrap_or(self.window.as_secs());

            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit: self.max_requests,
                reset_in_seconds,
            };
        }

        client_records.push(now);

        RateLimitDecision {
            allowed: true,
            remaining: self.max_requests - (count + 1),
            limit: self.max_requests,
            reset_in_seconds: self.window.as_secs(),
        }
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if should_cleanup {
            *self.last_cleanup.write().await = Instant::now();

            let now = Instant::now();
            let cutoff = now.checked_sub(self.window).unwrap_or(now);

            let mut records = self.records.write().await;
            for client_records in records.values_mut() {
                client_records.retain(|t| *t > cutoff);
            }
            records.retain(|_, v| !v.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_first_request() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));

        let decision = limiter.check_and_record("10.0.0.1").await;

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 9);
        assert_eq!(decision.limit, 10);
    }

    #[tokio::test]
    async fn test_rejects_request_over_limit() {
        let limiter = RateLimiter::new(100, Duration::from_secs(900));

        for _ in 0..100 {
            assert!(limiter.check_and_record("10.0.0.1").await.allowed);
        }

        let decision = limiter.check_and_record("10.0.0.1").await;
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert!(decision.reset_in_seconds <= 900);
    }

    #[tokio::test]
    async fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        limiter.check_and_record("a").await;

        assert!(limiter.check_and_record("b").await.allowed);
        assert!(!limiter.check_and_record("a").await.allowed);
    }

    #[tokio::test]
    async fn test_window_slides() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));

        assert!(limiter.check_and_record("a").await.allowed);
        assert!(!limiter.check_and_record("a").await.allowed);

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(limiter.check_and_record("a").await.allowed);
    }
}
