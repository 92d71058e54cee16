//! Crawl error taxonomy

use crate::ports::browser::BrowserError;
use crate::ports::record_store::StoreError;
use crate::ports::secrets::SecretError;
use crate::wait::WaitError;
use harvest_domain::DomainError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can end a crawl run.
///
/// No per-record error is swallowed: the first one aborts the run, and
/// records already written are skipped on the next run.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Unexpected page structure: {0}")]
    Structural(String),

    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Secret provider error: {0}")]
    Secret(#[from] SecretError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<DomainError> for CrawlError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        if err.is_configuration() {
            CrawlError::Configuration(message)
        } else if err.is_navigation() {
            CrawlError::Navigation(message)
        } else {
            CrawlError::Extraction(message)
        }
    }
}

impl From<WaitError> for CrawlError {
    fn from(err: WaitError) -> Self {
        CrawlError::from_wait("page load", err)
    }
}

impl CrawlError {
    /// A timed-out wait becomes [`CrawlError::Timeout`] naming `what`
    pub fn from_wait(what: &str, err: WaitError) -> Self {
        match err {
            WaitError::Timeout(after) => CrawlError::Timeout {
                what: what.to_string(),
                after,
            },
            WaitError::Browser(e) => CrawlError::Browser(e),
        }
    }

    /// A login form element that never showed up
    pub fn login_wait(what: &str, err: WaitError) -> Self {
        match err {
            WaitError::Timeout(after) => {
                CrawlError::Login(format!("{} not found within {:?}", what, after))
            }
            WaitError::Browser(e) => CrawlError::Browser(e),
        }
    }

    /// A record page that never reached a terminal state
    pub fn extraction_wait(what: &str, err: WaitError) -> Self {
        match err {
            WaitError::Timeout(after) => {
                CrawlError::Extraction(format!("{} not ready within {:?}", what, after))
            }
            WaitError::Browser(e) => CrawlError::Browser(e),
        }
    }

    /// Whether simply running again may succeed.
    ///
    /// Configuration, navigation-safety, login and structural errors need an
    /// operator to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrawlError::Extraction(_) | CrawlError::Timeout { .. } | CrawlError::Browser(_)
        )
    }
}
