//! Bounded exponential backoff for rate-limited and transient failures.

use std::time::Duration;

use tracing::warn;

use crate::error::NotionError;

/// Retry policy for API calls.
///
/// A retryable error (rate limit, transport failure, 502/503/504) is retried
/// after `initial_delay`, doubling on every attempt up to `max_delay`. A
/// `Retry-After` hint raises the wait, still capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Policy from plugin configuration.
    pub fn from_config(config: &notionize_config::NotionConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: config.retry_initial_delay(),
            max_delay: config.retry_max_delay(),
        }
    }

    /// Wait before retry number `retry` (0-based) after `error`.
    pub fn delay(&self, retry: u32, error: &NotionError) -> Duration {
        let backoff = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_delay);
        error
            .retry_after()
            .map_or(backoff, |hint| backoff.max(hint).min(self.max_delay))
    }

    /// Run `op`, retrying retryable errors.
    ///
    /// Returns the first success, the first non-retryable error, or the last
    /// error once retries are exhausted.
    pub fn run<T>(
        &self,
        operation: &str,
        mut op: impl FnMut() -> Result<T, NotionError>,
    ) -> Result<T, NotionError> {
        let mut retry = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && retry < self.max_retries => {
                    let delay = self.delay(retry, &err);
                    retry += 1;
                    warn!(
                        operation,
                        error = %err,
                        attempt = retry,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying Notion API call"
                    );
                    std::thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn instant(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    fn rate_limited() -> NotionError {
        NotionError::RateLimited { retry_after: None }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        let err = rate_limited();
        assert_eq!(policy.delay(0, &err), Duration::from_secs(1));
        assert_eq!(policy.delay(1, &err), Duration::from_secs(2));
        assert_eq!(policy.delay(4, &err), Duration::from_secs(16));
        assert_eq!(policy.delay(5, &err), Duration::from_secs(30));
        assert_eq!(policy.delay(40, &err), Duration::from_secs(30));
    }

    #[test]
    fn test_retry_after_raises_delay() {
        let policy = RetryPolicy::default();
        let err = NotionError::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(policy.delay(0, &err), Duration::from_secs(7));

        let err = NotionError::RateLimited {
            retry_after: Some(Duration::from_secs(120)),
        };
        assert_eq!(policy.delay(0, &err), Duration::from_secs(30));
    }

    #[test]
    fn test_run_retries_until_success() {
        let calls = Cell::new(0);
        let result = instant(5).run("test", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(rate_limited())
            } else {
                Ok("done")
            }
        });
        assert_eq!(result, Ok("done"));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_run_gives_up_after_max_retries() {
        let calls = Cell::new(0);
        let result: Result<(), _> = instant(2).run("test", || {
            calls.set(calls.get() + 1);
            Err(NotionError::Transport("reset".to_owned()))
        });
        assert_eq!(result, Err(NotionError::Transport("reset".to_owned())));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_run_does_not_retry_permanent_errors() {
        let calls = Cell::new(0);
        let result: Result<(), _> = instant(5).run("test", || {
            calls.set(calls.get() + 1);
            Err(NotionError::Http {
                status: 400,
                body: "validation_error".to_owned(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_none_policy() {
        let calls = Cell::new(0);
        let result: Result<(), _> = RetryPolicy {
            initial_delay: Duration::ZERO,
            ..RetryPolicy::none()
        }
        .run("test", || {
            calls.set(calls.get() + 1);
            Err(rate_limited())
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
