//! Retry policy for model requests.

use std::fmt;
use std::time::Duration;

/// Default number of attempts, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay before the second attempt, in milliseconds.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// Default growth factor between consecutive delays.
pub const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;

/// Rate limiting (429) and any server error (5xx).
pub fn is_rate_limit_or_server_error(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Bounded exponential backoff.
///
/// Attempt `n` (zero-based) that fails with a retryable error is followed by a
/// wait of `initial_delay * multiplier^n`, unless it was the last attempt.
#[derive(Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Zero is treated as one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
    /// Decides which HTTP statuses are retried.
    pub retryable_status: fn(u16) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            retryable_status: is_rate_limit_or_server_error,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("multiplier", &self.multiplier)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Three attempts with the same 1s/2s schedule.
    pub fn conservative() -> Self {
        Self {
            max_attempts: 3,
            ..Self::default()
        }
    }

    /// A single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the second attempt.
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set the backoff growth factor.
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Replace the retryable-status predicate.
    pub fn with_retryable_status(mut self, predicate: fn(u16) -> bool) -> Self {
        self.retryable_status = predicate;
        self
    }

    /// Effective attempt ceiling.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the failed zero-based `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor)
    }

    /// Whether an HTTP status should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        (self.retryable_status)(status)
    }

    /// Sum of every wait the policy can incur.
    pub fn total_backoff(&self) -> Duration {
        (0..self.attempts() - 1).map(|attempt| self.delay_for(attempt)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 5);
        let waits: Vec<u128> = (0..4).map(|i| policy.delay_for(i).as_millis()).collect();
        assert_eq!(waits, vec![1000, 2000, 4000, 8000]);
        assert_eq!(policy.total_backoff(), Duration::from_millis(15_000));
    }

    #[test]
    fn test_conservative_policy() {
        let policy = RetryPolicy::conservative();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.total_backoff(), Duration::from_millis(3000));
    }

    #[test]
    fn test_no_retry_policy() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.total_backoff(), Duration::ZERO);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::default().with_max_attempts(0);
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.total_backoff(), Duration::ZERO);
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry_status(429));
        assert!(policy.should_retry_status(500));
        assert!(policy.should_retry_status(503));
        assert!(!policy.should_retry_status(400));
        assert!(!policy.should_retry_status(401));
        assert!(!policy.should_retry_status(404));
    }

    #[test]
    fn test_custom_predicate() {
        let policy = RetryPolicy::default().with_retryable_status(|status| status == 503);
        assert!(policy.should_retry_status(503));
        assert!(!policy.should_retry_status(429));
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::default().with_multiplier(u32::MAX);
        assert!(policy.delay_for(10) >= policy.delay_for(1));
    }
}
