//! Retry configuration for SES requests.

use rand::Rng;
use std::time::Duration;

use crate::error::SesError;

/// Exponential backoff settings applied to retryable SES failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_attempts: u32,

    /// Backoff before the first retry.
    pub initial_backoff: Duration,

    /// Upper bound for any single backoff.
    pub max_backoff: Duration,

    /// Multiplier applied per attempt.
    pub backoff_multiplier: f64,

    /// Whether to apply full jitter.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(20),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-indexed).
    ///
    /// ```
    /// use std::time::Duration;
    /// use ses_identity::config::RetryConfig;
    ///
    /// let config = RetryConfig { jitter: false, ..RetryConfig::default() };
    /// assert_eq!(config.calculate_delay(2), Duration::from_millis(400));
    /// ```
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let backoff_millis =
            self.initial_backoff.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let capped = Duration::from_millis(backoff_millis as u64).min(self.max_backoff);

        if self.jitter && !capped.is_zero() {
            let millis = rand::thread_rng().gen_range(0..=capped.as_millis() as u64);
            Duration::from_millis(millis)
        } else {
            capped
        }
    }

    /// Whether `error` should be retried after `attempt` retries have already run.
    pub fn should_retry(&self, attempt: u32, error: &SesError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }
}
