//! Structured configuration issues.
//!
//! Configuration loaders report problems as [`ConfigIssue`]s instead of
//! failing on the first one, so every issue can be shown at once.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the run cannot start.
    Error,
    /// Non-fatal: the run starts but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The vendor domain key has no profile.
    UnsupportedDomain { value: String, supported: Vec<String> },
    /// A required field is missing or empty.
    MissingField { field: String },
    /// Digital orders requested for a locale without a digital section.
    DigitalOrdersUnavailable { domain: String },
    /// Neither regular nor digital orders are enabled.
    NothingToRetrieve,
    /// A duration or count is zero.
    ZeroValue { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let e = ConfigIssue::error(ConfigIssueCode::NothingToRetrieve, "nothing");
        assert!(e.is_error());
        let w = ConfigIssue::warning(
            ConfigIssueCode::ZeroValue {
                field: "timeouts.retry_attempts".into(),
            },
            "zero",
        );
        assert!(!w.is_error());
        assert_eq!(w.message, "zero");
    }
}
