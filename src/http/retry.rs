use std::time::Duration;

use crate::constants::{MAX_RETRY_AFTER_SECS, RETRYABLE_STATUS_CODES};
use crate::utils::jitter;

/// Bounded exponential backoff.
///
/// Attempts are numbered from 1. After a retryable failure of attempt `k`,
/// the wait is `base_delay * 2^(k-1)` plus up to one second of jitter, unless
/// the server asked for a specific delay with `Retry-After`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn is_retryable_status(status: u16) -> bool {
        RETRYABLE_STATUS_CODES.contains(&status)
    }

    /// Whether another attempt may follow attempt number `attempt`.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Deterministic part of the wait after attempt `attempt` failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Wait before the attempt following `attempt`, with fresh jitter.
    pub fn delay_after(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(server_delay) => server_delay.min(Duration::from_secs(MAX_RETRY_AFTER_SECS)),
            None => self.backoff(attempt) + jitter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
        assert_eq!(policy.backoff(4), Duration::from_secs(16));
    }

    #[test]
    fn test_delay_after_adds_bounded_jitter() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2));
        for attempt in 1..5 {
            let delay = policy.delay_after(attempt, None);
            let floor = policy.backoff(attempt);
            assert!(delay >= floor);
            assert!(delay < floor + Duration::from_secs(1));
        }
    }

    #[test]
    fn test_retry_after_takes_precedence() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2));
        assert_eq!(
            policy.delay_after(3, Some(Duration::from_secs(1))),
            Duration::from_secs(1)
        );
        assert_eq!(
            policy.delay_after(1, Some(Duration::from_secs(3600))),
            Duration::from_secs(MAX_RETRY_AFTER_SECS)
        );
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [500, 502, 503, 504] {
            assert!(RetryPolicy::is_retryable_status(status));
        }
        for status in [200, 400, 401, 404, 429, 501] {
            assert!(!RetryPolicy::is_retryable_status(status));
        }
    }

    #[test]
    fn test_attempt_budget() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2));
        assert!(policy.has_attempts_left(4));
        assert!(!policy.has_attempts_left(5));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }
}
