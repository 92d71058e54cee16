//! Browser configuration from TOML (`[browser]` section)

use crate::browser::BrowserOptions;
use harvest_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// WebDriver endpoint and Chrome settings
///
/// # Example
///
/// ```toml
/// [browser]
/// webdriver_url = "http://localhost:4444"
/// profile_dir = "/cache/amazon"   # keeps cookies between runs
/// headless = true
/// args = ["--disable-gpu"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBrowserConfig {
    pub webdriver_url: String,
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
    pub args: Vec<String>,
}

impl Default for FileBrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            profile_dir: None,
            headless: false,
            args: Vec::new(),
        }
    }
}

impl FileBrowserConfig {
    pub fn options(&self) -> BrowserOptions {
        BrowserOptions {
            headless: self.headless,
            profile_dir: self.profile_dir.clone(),
            args: self.args.clone(),
        }
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        if self.webdriver_url.trim().is_empty() {
            vec![ConfigIssue::error(
                ConfigIssueCode::MissingField {
                    field: "browser.webdriver_url".to_string(),
                },
                "browser.webdriver_url: no WebDriver endpoint configured",
            )]
        } else {
            vec![]
        }
    }
}
