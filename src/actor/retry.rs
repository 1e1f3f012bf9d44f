//! Exponential backoff for actor operations that talk to remote services.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
        }
    }

    /// Delay before retry number `retry` (0-based), doubling up to `max_delay`
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Run `operation` until it succeeds, fails with a non-transient error, or
/// runs out of retries. The last error is returned.
pub async fn with_retry<F, Fut, T, E, P>(
    config: &RetryConfig,
    is_transient: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut retry = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if retry < config.max_retries && is_transient(&e) => {
                let delay = config.delay_for(retry);
                retry += 1;
                tracing::warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}",
                    retry,
                    config.max_retries + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::new(3, Duration::from_millis(5), Duration::from_millis(20))
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = RetryConfig::new(5, Duration::from_millis(100), Duration::from_millis(350));
        assert_eq!(config.delay_for(0), Duration::from_millis(100));
        assert_eq!(config.delay_for(1), Duration::from_millis(200));
        assert_eq!(config.delay_for(2), Duration::from_millis(350));
        assert_eq!(config.delay_for(40), Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, &str> = with_retry(&fast(), |_| true, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("revised") }
        })
        .await;

        assert_eq!(result, Ok("revised"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(&fast(), |_| true, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n < 3 { Err("rate limited") } else { Ok(n) } }
        })
        .await;

        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let config = RetryConfig::new(2, Duration::from_millis(5), Duration::from_millis(10));
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = with_retry(&config, |_| true, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("unavailable") }
        })
        .await;

        assert_eq!(result, Err("unavailable"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = with_retry(&fast(), |e| *e != "unauthorized", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("unauthorized") }
        })
        .await;

        assert_eq!(result, Err("unauthorized"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
