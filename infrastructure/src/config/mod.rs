//! Configuration file loading for invoice-harvest
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `HARVEST_` prefix, `__` between section and key
//!    (e.g. `HARVEST_CREDENTIALS__PASSWORD`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./harvest.toml` or `./.harvest.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/invoice-harvest/config.toml`
//! 5. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileBrowserConfig, FileConfig, FileCredentialsConfig, FileOutputConfig, FileTimeoutsConfig,
    FileVendorConfig, SecretProviderKind,
};
pub use loader::ConfigLoader;

use harvest_domain::ConfigIssue;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue.message))
        .collect::<Vec<_>>()
        .join("\n")
}
