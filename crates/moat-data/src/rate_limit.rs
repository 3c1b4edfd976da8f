//! Sliding-window request rate limiting.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Default budget: 2 requests per 5 seconds
const DEFAULT_MAX_REQUESTS: usize = 2;
const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

/// Configuration for [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum number of requests admitted within one window (default: 2)
    pub max_requests: usize,
    /// Length of the sliding window (default: 5s)
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Admits at most `max_requests` acquisitions in any `window`.
///
/// Each [`acquire`](Self::acquire) records a timestamp; once the window is full
/// the caller sleeps until the oldest timestamp ages out.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    history: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a limiter. A `max_requests` of zero is treated as one.
    pub fn new(config: RateLimitConfig) -> Self {
        let config = RateLimitConfig {
            max_requests: config.max_requests.max(1),
            ..config
        };
        Self {
            history: VecDeque::with_capacity(config.max_requests),
            config,
        }
    }

    /// The effective configuration.
    pub const fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Wait until a request slot is free, then claim it.
    pub async fn acquire(&mut self) {
        loop {
            let now = Instant::now();
            self.evict_expired(now);

            if self.history.len() < self.config.max_requests {
                self.history.push_back(now);
                return;
            }

            if let Some(oldest) = self.history.front() {
                let wait = self.config.window.saturating_sub(now - *oldest);
                debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");
                sleep(wait).await;
            }
        }
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some(oldest) = self.history.front() {
            if now - *oldest >= self.config.window {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_requests_are_immediate() {
        let mut limiter = RateLimiter::default();
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_request_waits_for_window() {
        let mut limiter = RateLimiter::default();
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let mut limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(5),
        });
        let start = Instant::now();

        limiter.acquire().await;
        sleep(Duration::from_secs(3)).await;
        limiter.acquire().await;
        // Slot of the first request frees at t=5s
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(6));
        // Slot of the second request frees at t=8s
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(8) && elapsed < Duration::from_secs(9));
    }

    #[test]
    fn test_zero_budget_is_clamped() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 0,
            window: Duration::from_secs(1),
        });
        assert_eq!(limiter.config().max_requests, 1);
    }
}
