//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types once
//! validated.

mod browser;
mod credentials;
mod output;
mod timeouts;
mod vendor;

pub use browser::FileBrowserConfig;
pub use credentials::{FileCredentialsConfig, SecretProviderKind};
pub use output::FileOutputConfig;
pub use timeouts::FileTimeoutsConfig;
pub use vendor::FileVendorConfig;

use harvest_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Vendor locale and what to collect
    pub vendor: FileVendorConfig,
    /// Output directory and layout
    pub output: FileOutputConfig,
    /// Username and secret provider
    pub credentials: FileCredentialsConfig,
    /// WebDriver endpoint and browser settings
    pub browser: FileBrowserConfig,
    /// Polling and retry pacing
    pub timeouts: FileTimeoutsConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.vendor.validate());
        issues.extend(self.output.validate());
        issues.extend(self.credentials.validate(self.vendor.one_time_code));
        issues.extend(self.browser.validate());
        issues.extend(self.timeouts.to_wait_policy().1);
        issues
    }

    /// Render as TOML with secrets masked
    pub fn to_display_toml(&self) -> Result<String, toml::ser::Error> {
        let redacted = Self {
            credentials: self.credentials.redacted(),
            ..self.clone()
        };
        toml::to_string_pretty(&redacted)
    }
}
