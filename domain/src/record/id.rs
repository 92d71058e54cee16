//! Record ids and the per-locale patterns that find them

use crate::core::error::DomainError;
use crate::profile::DomainProfile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vendor order or transaction id, e.g. `166-7926740-5141621` (Value Object)
///
/// Ids name output files, so they are restricted to ASCII alphanumerics and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Parse an id, returning `None` for empty strings or foreign characters
    pub fn parse(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid record id {value:?}"))
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Compiled id and date patterns for one profile
#[derive(Debug, Clone)]
pub struct RecordPatterns {
    id: Regex,
    date: Regex,
}

impl RecordPatterns {
    pub fn for_profile(profile: &DomainProfile) -> Result<Self, DomainError> {
        let id_pattern = format!(
            r"[?&]{}=([A-Za-z0-9][A-Za-z0-9-]*)",
            regex::escape(profile.id_parameter)
        );
        Ok(Self {
            id: compile(&id_pattern)?,
            date: compile(profile.date_pattern)?,
        })
    }

    /// Extract the id from an invoice link
    pub fn record_id(&self, href: &str) -> Result<RecordId, DomainError> {
        self.id
            .captures(href)
            .and_then(|caps| caps.get(1))
            .and_then(|m| RecordId::parse(m.as_str()))
            .ok_or_else(|| DomainError::MissingRecordId(href.to_string()))
    }

    /// Four-digit order year found in an invoice page, if any
    pub fn year(&self, source: &str) -> Option<String> {
        self.date
            .captures(source)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

fn compile(pattern: &str) -> Result<Regex, DomainError> {
    Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
