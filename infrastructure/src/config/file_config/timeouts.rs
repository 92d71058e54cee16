//! Timeout configuration from TOML (`[timeouts]` section)

use harvest_application::WaitPolicy;
use harvest_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling and retry pacing
///
/// # Example
///
/// ```toml
/// [timeouts]
/// wait_secs = 30
/// poll_interval_ms = 500
/// retry_delay_secs = 2
/// retry_attempts = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    pub wait_secs: u64,
    pub poll_interval_ms: u64,
    pub retry_delay_secs: u64,
    pub retry_attempts: usize,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        let policy = WaitPolicy::default();
        Self {
            wait_secs: policy.timeout.as_secs(),
            poll_interval_ms: policy.poll_interval.as_millis() as u64,
            retry_delay_secs: policy.retry_delay.as_secs(),
            retry_attempts: policy.retry_attempts,
        }
    }
}

impl FileTimeoutsConfig {
    /// Convert into a wait policy; zero values fall back to the defaults
    pub fn to_wait_policy(&self) -> (WaitPolicy, Vec<ConfigIssue>) {
        let defaults = WaitPolicy::default();
        let mut issues = Vec::new();
        let mut policy = defaults.clone();

        if self.wait_secs == 0 {
            issues.push(zero("timeouts.wait_secs"));
        } else {
            policy.timeout = Duration::from_secs(self.wait_secs);
        }
        if self.poll_interval_ms == 0 {
            issues.push(zero("timeouts.poll_interval_ms"));
        } else {
            policy.poll_interval = Duration::from_millis(self.poll_interval_ms);
        }
        if self.retry_attempts == 0 {
            issues.push(zero("timeouts.retry_attempts"));
        } else {
            policy.retry_attempts = self.retry_attempts;
        }
        policy.retry_delay = Duration::from_secs(self.retry_delay_secs);

        (policy, issues)
    }
}

fn zero(field: &str) -> ConfigIssue {
    ConfigIssue::warning(
        ConfigIssueCode::ZeroValue {
            field: field.to_string(),
        },
        format!("{}: cannot be 0, using the default", field),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_wait_policy() {
        let (policy, issues) = FileTimeoutsConfig::default().to_wait_policy();
        assert!(issues.is_empty());
        assert_eq!(policy, WaitPolicy::default());
    }

    #[test]
    fn test_zero_values_fall_back() {
        let config = FileTimeoutsConfig {
            wait_secs: 0,
            poll_interval_ms: 250,
            retry_delay_secs: 0,
            retry_attempts: 0,
        };
        let (policy, issues) = config.to_wait_policy();
        assert_eq!(issues.len(), 2);
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.poll_interval, Duration::from_millis(250));
        assert_eq!(policy.retry_delay, Duration::ZERO);
        assert_eq!(policy.retry_attempts, 5);
    }
}
