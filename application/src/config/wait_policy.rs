//! Wait policy: how long to poll a flaky remote UI and how to retry.
//!
//! [`WaitPolicy`] is shared by every component of a run through the crawl
//! context. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling and retry parameters.
///
/// | Field            | Used by                                    |
/// |------------------|--------------------------------------------|
/// | `timeout`        | every wait: form fields, page loads, pages |
/// | `poll_interval`  | sleep between predicate evaluations        |
/// | `retry_delay`    | sleep between attempts of a retried action |
/// | `retry_attempts` | attempts before a retried action gives up  |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
    pub retry_attempts: usize,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            retry_delay: Duration::from_secs(2),
            retry_attempts: 5,
        }
    }
}

impl WaitPolicy {
    // ==================== Builder Methods ====================

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.poll_interval, Duration::from_millis(500));
        assert_eq!(policy.retry_delay, Duration::from_secs(2));
        assert_eq!(policy.retry_attempts, 5);
    }

    #[test]
    fn test_builder() {
        let policy = WaitPolicy::default()
            .with_timeout(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(10))
            .with_retry_delay(Duration::from_millis(20))
            .with_retry_attempts(2);
        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(policy.poll_interval, Duration::from_millis(10));
        assert_eq!(policy.retry_delay, Duration::from_millis(20));
        assert_eq!(policy.retry_attempts, 2);
    }
}
