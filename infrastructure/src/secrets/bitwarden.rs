//! Bitwarden CLI secret provider.
//!
//! Looks up passwords and TOTP codes with `bw get`. The vault must already
//! be unlocked (`BW_SESSION` exported); this provider never unlocks it.

use async_trait::async_trait;
use harvest_application::{SecretError, SecretProvider};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

const DEFAULT_PROGRAM: &str = "bw";

#[derive(Debug, Deserialize)]
struct VaultStatus {
    status: String,
}

#[derive(Debug, Clone)]
pub struct BitwardenSecrets {
    program: String,
}

impl Default for BitwardenSecrets {
    fn default() -> Self {
        Self::new()
    }
}

impl BitwardenSecrets {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Use a different `bw` executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run(&self, args: &[&str]) -> Result<String, SecretError> {
        if which::which(&self.program).is_err() {
            return Err(SecretError::CommandFailed(format!(
                "{} not found in PATH",
                self.program
            )));
        }

        debug!("Running {} {}", self.program, args.first().copied().unwrap_or_default());
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                SecretError::CommandFailed(format!("Failed to execute {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.contains("Not found") {
                return Err(SecretError::NotFound(args.last().copied().unwrap_or_default().to_string()));
            }
            return Err(SecretError::CommandFailed(format!(
                "{} {} failed: {}",
                self.program,
                args.join(" "),
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn ensure_unlocked(&self) -> Result<(), SecretError> {
        let stdout = self.run(&["status"]).await?;
        check_status(&stdout)
    }
}

fn check_status(stdout: &str) -> Result<(), SecretError> {
    let status: VaultStatus = serde_json::from_str(stdout.trim()).map_err(|e| {
        SecretError::CommandFailed(format!("Failed to parse bw status output: {}", e))
    })?;
    if status.status == "unlocked" {
        Ok(())
    } else {
        Err(SecretError::Locked(status.status))
    }
}

fn secret_value(stdout: String, id: &str) -> Result<String, SecretError> {
    let value = stdout.trim_end_matches(['\r', '\n']);
    if value.is_empty() {
        Err(SecretError::NotFound(id.to_string()))
    } else {
        Ok(value.to_string())
    }
}

#[async_trait]
impl SecretProvider for BitwardenSecrets {
    async fn password(&self, id: &str) -> Result<String, SecretError> {
        self.ensure_unlocked().await?;
        let stdout = self.run(&["get", "password", id]).await?;
        secret_value(stdout, id)
    }

    async fn one_time_code(&self, id: &str) -> Result<String, SecretError> {
        let stdout = self.run(&["get", "totp", id]).await?;
        secret_value(stdout, id)
    }
}
