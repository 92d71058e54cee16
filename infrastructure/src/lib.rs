//! Infrastructure layer for invoice-harvest
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod browser;
pub mod config;
pub mod secrets;
pub mod store;

// Re-export commonly used types
pub use browser::{BrowserOptions, WebDriverBrowser};
pub use config::{ConfigError, ConfigLoader, FileConfig, SecretProviderKind};
pub use secrets::{BitwardenSecrets, PlainSecrets};
pub use store::FileRecordStore;
