//! Credentials configuration from TOML (`[credentials]` section)

use crate::secrets::{BitwardenSecrets, PlainSecrets};
use harvest_application::Credentials;
use harvest_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where the password (and one-time codes) come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretProviderKind {
    /// Password stored in the configuration or environment
    #[default]
    Plain,
    /// Bitwarden CLI (`bw`), password and TOTP looked up by item id
    Bitwarden,
}

/// Login credentials
///
/// # Example
///
/// ```toml
/// [credentials]
/// username = "me@example.com"
/// provider = "bitwarden"
/// secret_id = "0f4c..."
/// ```
///
/// With the plain provider, prefer `HARVEST_CREDENTIALS__PASSWORD` over
/// writing the password to disk.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCredentialsConfig {
    pub username: Option<String>,
    pub provider: SecretProviderKind,
    pub password: Option<String>,
    pub secret_id: Option<String>,
}

impl fmt::Debug for FileCredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCredentialsConfig")
            .field("username", &self.username)
            .field("provider", &self.provider)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("secret_id", &self.secret_id)
            .finish()
    }
}

impl FileCredentialsConfig {
    /// Copy with the password masked, for display
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }

    /// Build credentials backed by the configured secret provider.
    ///
    /// `None` when a required field is missing; [`FileCredentialsConfig::validate`]
    /// reports which.
    pub fn credentials(&self) -> Option<Credentials> {
        let username = non_empty(&self.username)?;
        match self.provider {
            SecretProviderKind::Plain => {
                let password = self.password.clone()?;
                Some(Credentials::new(
                    username,
                    "password",
                    Arc::new(PlainSecrets::new(password)),
                ))
            }
            SecretProviderKind::Bitwarden => {
                let secret_id = non_empty(&self.secret_id)?;
                Some(Credentials::new(
                    username,
                    secret_id,
                    Arc::new(BitwardenSecrets::new()),
                ))
            }
        }
    }

    pub(super) fn validate(&self, one_time_code: bool) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if non_empty(&self.username).is_none() {
            issues.push(missing("credentials.username", "no username configured"));
        }
        match self.provider {
            SecretProviderKind::Plain => {
                if self.password.is_none() {
                    issues.push(missing(
                        "credentials.password",
                        "no password configured for the plain provider",
                    ));
                }
                if one_time_code {
                    issues.push(missing(
                        "credentials.secret_id",
                        "one-time codes need the bitwarden provider",
                    ));
                }
            }
            SecretProviderKind::Bitwarden => {
                if non_empty(&self.secret_id).is_none() {
                    issues.push(missing(
                        "credentials.secret_id",
                        "no Bitwarden item id configured",
                    ));
                }
            }
        }
        issues
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn missing(field: &str, reason: &str) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::MissingField {
            field: field.to_string(),
        },
        format!("{}: {}", field, reason),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_credentials() {
        let config = FileCredentialsConfig {
            username: Some("me@example.com".into()),
            password: Some("hunter2".into()),
            ..FileCredentialsConfig::default()
        };
        assert!(config.validate(false).is_empty());
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.username, "me@example.com");
    }

    #[test]
    fn test_plain_cannot_do_one_time_codes() {
        let config = FileCredentialsConfig {
            username: Some("me@example.com".into()),
            password: Some("hunter2".into()),
            ..FileCredentialsConfig::default()
        };
        let issues = config.validate(true);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("bitwarden"));
    }

    #[test]
    fn test_bitwarden_needs_secret_id() {
        let config: FileCredentialsConfig = toml::from_str(
            r#"
username = "me@example.com"
provider = "bitwarden"
"#,
        )
        .unwrap();
        assert_eq!(config.provider, SecretProviderKind::Bitwarden);
        assert!(config.credentials().is_none());
        assert_eq!(config.validate(false).len(), 1);
    }

    #[test]
    fn test_password_is_never_shown() {
        let config = FileCredentialsConfig {
            username: Some("me".into()),
            password: Some("hunter2".into()),
            ..FileCredentialsConfig::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
        assert_eq!(config.redacted().password.as_deref(), Some("********"));
    }
}
