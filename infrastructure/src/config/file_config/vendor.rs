//! Vendor configuration from TOML (`[vendor]` section)

use harvest_application::DiscoveryOptions;
use harvest_domain::{ConfigIssue, ConfigIssueCode, DomainError, DomainProfile};
use serde::{Deserialize, Serialize};

/// Which vendor locale to crawl, and what to collect there
///
/// # Example
///
/// ```toml
/// [vendor]
/// domain = ".de"
/// regular = true
/// digital = false                 # defaults to whether the locale has digital orders
/// order_groups = ["2023", "2024"] # default: every group except archived orders
/// one_time_code = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVendorConfig {
    /// Profile key: `.com`, `.co.uk` or `.de`
    pub domain: String,
    /// Walk regular orders
    pub regular: bool,
    /// Walk digital orders
    pub digital: Option<bool>,
    /// Only walk these order groups
    pub order_groups: Option<Vec<String>>,
    /// Login asks for a one-time code after the password
    pub one_time_code: bool,
}

impl Default for FileVendorConfig {
    fn default() -> Self {
        Self {
            domain: ".com".to_string(),
            regular: true,
            digital: None,
            order_groups: None,
            one_time_code: false,
        }
    }
}

impl FileVendorConfig {
    /// Resolve the domain profile, with the one-time-code stage applied
    pub fn profile(&self) -> Result<DomainProfile, DomainError> {
        Ok(DomainProfile::lookup(&self.domain)?.with_one_time_code(self.one_time_code))
    }

    /// Digital orders are walked when asked for, or by default when the
    /// locale has them
    pub fn digital_enabled(&self, profile: &DomainProfile) -> bool {
        self.digital.unwrap_or_else(|| profile.has_digital_orders())
    }

    pub fn discovery_options(&self, profile: &DomainProfile) -> DiscoveryOptions {
        let options = DiscoveryOptions::default()
            .with_regular(self.regular)
            .with_digital(self.digital_enabled(profile));
        match &self.order_groups {
            Some(groups) => options.with_order_groups(groups.clone()),
            None => options,
        }
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let profile = match self.profile() {
            Ok(profile) => profile,
            Err(DomainError::UnsupportedDomain { key, supported }) => {
                let message = format!(
                    "vendor.domain: '{}' is not supported (supported: {})",
                    key,
                    supported.join(", ")
                );
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnsupportedDomain {
                        value: key,
                        supported,
                    },
                    message,
                ));
                return issues;
            }
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnsupportedDomain {
                        value: self.domain.clone(),
                        supported: Vec::new(),
                    },
                    format!("vendor.domain: {}", e),
                ));
                return issues;
            }
        };

        if self.digital == Some(true) && !profile.has_digital_orders() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DigitalOrdersUnavailable {
                    domain: profile.key(),
                },
                format!(
                    "vendor.digital: amazon{} has no digital orders section, it will be skipped",
                    profile.key()
                ),
            ));
        }

        if !self.regular && !self.digital_enabled(&profile) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NothingToRetrieve,
                "vendor: neither regular nor digital orders are enabled",
            ));
        }

        if let Some(groups) = &self.order_groups {
            if groups.is_empty() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::MissingField {
                        field: "vendor.order_groups".to_string(),
                    },
                    "vendor.order_groups: empty list, no order group will be walked",
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_domain::tables::{DOT_CO_UK, DOT_COM};

    #[test]
    fn test_digital_defaults_to_profile() {
        let config = FileVendorConfig::default();
        assert!(config.digital_enabled(&DOT_COM));
        assert!(!config.digital_enabled(&DOT_CO_UK));
    }

    #[test]
    fn test_discovery_options() {
        let config = FileVendorConfig {
            digital: Some(false),
            order_groups: Some(vec!["2024".into()]),
            ..FileVendorConfig::default()
        };
        let options = config.discovery_options(&DOT_COM);
        assert!(options.regular);
        assert!(!options.digital);
        assert!(options.allows_group("2024"));
        assert!(!options.allows_group("2023"));
    }

    #[test]
    fn test_profile_applies_one_time_code() {
        let config = FileVendorConfig {
            domain: "de".into(),
            one_time_code: true,
            ..FileVendorConfig::default()
        };
        let profile = config.profile().unwrap();
        assert_eq!(profile.top_level, "de");
        assert!(profile.one_time_code);
    }

    #[test]
    fn test_unsupported_domain_is_error() {
        let config = FileVendorConfig {
            domain: ".fr".into(),
            ..FileVendorConfig::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(issues[0].message.contains(".co.uk"));
    }

    #[test]
    fn test_nothing_to_retrieve() {
        let config = FileVendorConfig {
            domain: ".co.uk".into(),
            regular: false,
            ..FileVendorConfig::default()
        };
        let issues = config.validate();
        assert!(issues
            .iter()
            .any(|i| i.code == ConfigIssueCode::NothingToRetrieve));
    }

    #[test]
    fn test_digital_on_locale_without_section_warns() {
        let config = FileVendorConfig {
            domain: ".de".into(),
            digital: Some(true),
            ..FileVendorConfig::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
