//! Password held in memory, taken from configuration or the environment

use async_trait::async_trait;
use harvest_application::{SecretError, SecretProvider};
use std::fmt;

pub struct PlainSecrets {
    password: String,
}

impl PlainSecrets {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl fmt::Debug for PlainSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainSecrets").finish_non_exhaustive()
    }
}

#[async_trait]
impl SecretProvider for PlainSecrets {
    async fn password(&self, _id: &str) -> Result<String, SecretError> {
        Ok(self.password.clone())
    }

    async fn one_time_code(&self, _id: &str) -> Result<String, SecretError> {
        Err(SecretError::Unsupported(
            "one-time codes need the bitwarden provider".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_password_ignores_id() {
        let secrets = PlainSecrets::new("hunter2");
        assert_eq!(secrets.password("anything").await.unwrap(), "hunter2");
    }

    #[tokio::test]
    async fn test_one_time_code_unsupported() {
        let secrets = PlainSecrets::new("hunter2");
        assert!(matches!(
            secrets.one_time_code("x").await,
            Err(SecretError::Unsupported(_))
        ));
    }

    #[test]
    fn test_debug_hides_password() {
        assert!(!format!("{:?}", PlainSecrets::new("hunter2")).contains("hunter2"));
    }
}
