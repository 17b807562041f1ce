use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Backoff schedule for a cached query.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    pub retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (2.0 doubles the delay each time)
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// `retries` retries with the default schedule: 1s, doubling, capped at 30s.
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self::new(0)
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Total attempts, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay before a given attempt (0-indexed). The first attempt never waits.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Run `operation` until it succeeds, the attempts run out, or
/// `should_retry` rejects the last error. The predicate is asked again after
/// each backoff sleep, so a retry never starts once it has turned false.
/// Returns the last error on failure.
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 0;
    let mut last_error: Option<E> = None;

    loop {
        if let Some(e) = last_error.take() {
            let delay = config.delay_for_attempt(attempt);
            debug!(
                "{}: Retry attempt {}/{} after {:?}",
                operation_name,
                attempt + 1,
                max_attempts,
                delay
            );
            sleep(delay).await;

            if !should_retry(&e) {
                debug!("{}: Dropping retry after backoff: {}", operation_name, e);
                return Err(e);
            }
        }

        let e = match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "{}: Succeeded on attempt {}/{}",
                        operation_name,
                        attempt + 1,
                        max_attempts
                    );
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        attempt += 1;
        if attempt >= max_attempts {
            if max_attempts > 1 {
                warn!(
                    "{}: All {} attempts failed. Last error: {}",
                    operation_name, max_attempts, e
                );
            }
            return Err(e);
        }

        if !should_retry(&e) {
            debug!("{}: Not retrying after error: {}", operation_name, e);
            return Err(e);
        }

        warn!(
            "{}: Attempt {}/{} failed ({}), {} retries remaining",
            operation_name,
            attempt,
            max_attempts,
            e,
            max_attempts - attempt
        );
        last_error = Some(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast(retries: u32) -> RetryConfig {
        RetryConfig::new(retries).with_initial_delay(Duration::from_millis(1))
    }

    // ==================== Schedule ====================

    #[test]
    fn test_default_schedule() {
        let config = RetryConfig::default();
        assert_eq!(config.retries, 3);
        assert_eq!(config.max_attempts(), 4);
        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let config = RetryConfig::new(10);
        assert_eq!(config.delay_for_attempt(6), Duration::from_secs(30));
        assert_eq!(config.delay_for_attempt(9), Duration::from_secs(30));
    }

    #[test]
    fn test_none_means_single_attempt() {
        assert_eq!(RetryConfig::none().max_attempts(), 1);
    }

    #[test]
    fn test_custom_multiplier() {
        let config = RetryConfig::new(3)
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_multiplier(3.0);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(300));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(900));
    }

    // ==================== Execution ====================

    #[tokio::test]
    async fn test_success_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<u32, String> = with_retry_if(
            &fast(3),
            "test",
            || {
                let c = c.clone();
                async move { Ok(c.fetch_add(1, Ordering::SeqCst)) }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Ok(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<&str, String> = with_retry_if(
            &fast(3),
            "test",
            || {
                let c = c.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("boom".to_string())
                    } else {
                        Ok("done")
                    }
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_retries_and_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), String> = with_retry_if(
            &fast(2),
            "test",
            || {
                let c = c.clone();
                async move { Err(format!("failure {}", c.fetch_add(1, Ordering::SeqCst))) }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_calls_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), String> = with_retry_if(
            &RetryConfig::none(),
            "test",
            || {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err("nope".to_string()) }
            },
            |_| true,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_predicate_stops_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let result: Result<(), String> = with_retry_if(
            &fast(5),
            "test",
            || {
                let n = c.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err("retryable".to_string())
                    } else {
                        Err("fatal".to_string())
                    }
                }
            },
            |e| e == "retryable",
        )
        .await;

        assert_eq!(result, Err("fatal".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_predicate_rechecked_after_backoff() {
        use std::sync::atomic::AtomicBool;

        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let wanted = Arc::new(AtomicBool::new(true));
        let w = wanted.clone();

        // Flips while the first backoff is sleeping.
        tokio::spawn(async move {
            sleep(Duration::from_millis(10)).await;
            w.store(false, Ordering::SeqCst);
        });

        let config = RetryConfig::new(3).with_initial_delay(Duration::from_millis(50));
        let result: Result<(), String> = with_retry_if(
            &config,
            "test",
            || {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err("unavailable".to_string()) }
            },
            |_| wanted.load(Ordering::SeqCst),
        )
        .await;

        assert_eq!(result, Err("unavailable".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backoff_waits_between_attempts() {
        let config = RetryConfig::new(2).with_initial_delay(Duration::from_millis(20));
        let start = tokio::time::Instant::now();

        let _: Result<(), String> =
            with_retry_if(&config, "test", || async { Err("x".to_string()) }, |_| true).await;

        // 20ms + 40ms
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
