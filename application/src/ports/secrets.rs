//! Secret provider port
//!
//! Passwords and one-time codes are fetched on demand. One-time codes expire
//! within seconds, so callers must request them immediately before use.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while fetching secrets
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Secret store is {0}")]
    Locked(String),

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Not supported by this secret provider: {0}")]
    Unsupported(String),

    #[error("Secret command failed: {0}")]
    CommandFailed(String),
}

/// Source of passwords and one-time codes, keyed by an item id
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn password(&self, id: &str) -> Result<String, SecretError>;

    /// A freshly generated one-time code
    async fn one_time_code(&self, id: &str) -> Result<String, SecretError>;
}

/// Login credentials: a username plus lazy access to the secrets behind it
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub secret_id: String,
    provider: Arc<dyn SecretProvider>,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        secret_id: impl Into<String>,
        provider: Arc<dyn SecretProvider>,
    ) -> Self {
        Self {
            username: username.into(),
            secret_id: secret_id.into(),
            provider,
        }
    }

    pub async fn password(&self) -> Result<String, SecretError> {
        self.provider.password(&self.secret_id).await
    }

    pub async fn one_time_code(&self) -> Result<String, SecretError> {
        self.provider.one_time_code(&self.secret_id).await
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret_id", &self.secret_id)
            .finish_non_exhaustive()
    }
}
