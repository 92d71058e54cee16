//! Application layer for invoice-harvest
//!
//! This crate contains use cases, port definitions, the wait/retry
//! primitives and application configuration. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod use_cases;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{DiscoveryOptions, WaitPolicy};
pub use ports::{
    browser::{BrowserError, BrowserPort, ElementHandle, PageMarker},
    progress::{ArchiveProgress, NoProgress},
    record_store::{RecordStore, StoreError},
    secrets::{Credentials, SecretError, SecretProvider},
};
pub use use_cases::archive_records::{ArchiveInput, ArchiveRecordsUseCase, ArchiveSummary};
pub use use_cases::context::CrawlContext;
pub use use_cases::error::CrawlError;
pub use use_cases::session::SessionController;
pub use wait::WaitError;
