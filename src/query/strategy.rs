//! Caching strategies: how long data stays fresh, how long an unobserved
//! entry is kept, and how failed fetches are retried.

use std::time::{Duration, Instant};

use crate::retry::RetryConfig;

const MINUTE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub struct QueryStrategy {
    name: &'static str,
    /// `None` means data never goes stale on its own.
    pub stale_time: Option<Duration>,
    pub gc_time: Duration,
    pub retry: RetryConfig,
}

impl QueryStrategy {
    /// Content that only changes on deploy.
    pub fn static_content() -> Self {
        Self {
            name: "static",
            stale_time: None,
            gc_time: 60 * MINUTE,
            retry: RetryConfig::new(3),
        }
    }

    /// User-driven data such as search results.
    pub fn standard() -> Self {
        Self {
            name: "standard",
            stale_time: Some(5 * MINUTE),
            gc_time: 30 * MINUTE,
            retry: RetryConfig::new(3),
        }
    }

    pub fn frequent() -> Self {
        Self {
            name: "frequent",
            stale_time: Some(Duration::from_secs(30)),
            gc_time: 30 * MINUTE,
            retry: RetryConfig::new(3),
        }
    }

    /// Always refetch, never retry.
    pub fn none() -> Self {
        Self {
            name: "none",
            stale_time: Some(Duration::ZERO),
            gc_time: 30 * MINUTE,
            retry: RetryConfig::none(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn with_stale_time(mut self, stale_time: Option<Duration>) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Whether data last written at `updated_at` is stale at `now`.
    pub fn is_stale(&self, updated_at: Instant, now: Instant) -> bool {
        match self.stale_time {
            Some(stale_time) => now.saturating_duration_since(updated_at) >= stale_time,
            None => false,
        }
    }
}

impl Default for QueryStrategy {
    fn default() -> Self {
        Self::standard()
    }
}
