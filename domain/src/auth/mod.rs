//! Login session states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the browser session is logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotAuthenticated,
    Authenticated,
}

/// Steps of the login flow.
///
/// ```text
/// Unknown -> CheckingExisting -> AlreadyAuthenticated ----------------------------> Authenticated
///                             \-> AwaitingUsername -> AwaitingPassword -> [AwaitingOneTimeCode] -/
/// ```
///
/// A session that degrades mid-crawl re-enters at `AwaitingPassword`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    Unknown,
    CheckingExisting,
    AlreadyAuthenticated,
    AwaitingUsername,
    AwaitingPassword,
    AwaitingOneTimeCode,
    Authenticated,
}

impl LoginStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStage::Unknown => "unknown",
            LoginStage::CheckingExisting => "checking-existing",
            LoginStage::AlreadyAuthenticated => "already-authenticated",
            LoginStage::AwaitingUsername => "awaiting-username",
            LoginStage::AwaitingPassword => "awaiting-password",
            LoginStage::AwaitingOneTimeCode => "awaiting-one-time-code",
            LoginStage::Authenticated => "authenticated",
        }
    }

    /// Stage that follows the password step
    pub fn after_password(one_time_code: bool) -> Self {
        if one_time_code {
            LoginStage::AwaitingOneTimeCode
        } else {
            LoginStage::Authenticated
        }
    }
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        assert_eq!(SessionState::default(), SessionState::NotAuthenticated);
    }

    #[test]
    fn test_after_password() {
        assert_eq!(
            LoginStage::after_password(true),
            LoginStage::AwaitingOneTimeCode
        );
        assert_eq!(LoginStage::after_password(false), LoginStage::Authenticated);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LoginStage::AwaitingOneTimeCode.to_string(),
            "awaiting-one-time-code"
        );
    }
}
