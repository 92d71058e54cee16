//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Domain '{key}' not supported. Supported domains: {}", supported.join(", "))]
    UnsupportedDomain {
        key: String,
        supported: Vec<String>,
    },

    #[error("Reached invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to parse order ID from href {0:?}")]
    MissingRecordId(String),

    #[error("Content retrieved for order {0} does not mention it")]
    RecordIdNotInContent(String),

    #[error("Failed to get date for order {0}")]
    MissingRecordDate(String),

    #[error("Vendor reported a problem loading order {0}")]
    VendorProblem(String),

    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl DomainError {
    /// Unsupported profile keys and broken profile patterns
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::UnsupportedDomain { .. } | DomainError::InvalidPattern { .. }
        )
    }

    /// Off-domain or insecure URLs
    pub fn is_navigation(&self) -> bool {
        matches!(self, DomainError::InvalidUrl { .. })
    }

    /// Failures to pull an id, a date or a usable document out of a page
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            DomainError::MissingRecordId(_)
                | DomainError::RecordIdNotInContent(_)
                | DomainError::MissingRecordDate(_)
                | DomainError::VendorProblem(_)
        )
    }
}
