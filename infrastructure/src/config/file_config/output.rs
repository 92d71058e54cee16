//! Output configuration from TOML (`[output]` section)

use harvest_domain::{ConfigIssue, ConfigIssueCode, OutputLayout};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where invoices are written
///
/// # Example
///
/// ```toml
/// [output]
/// directory = "/data/amazon"
/// dir_per_year = true   # /data/amazon/<year>/<id>.html
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output root, created if absent
    pub directory: Option<PathBuf>,
    /// Bucket documents by order year
    pub dir_per_year: bool,
}

impl FileOutputConfig {
    pub fn layout(&self) -> Option<OutputLayout> {
        self.directory
            .as_ref()
            .map(|dir| OutputLayout::new(dir.clone(), self.dir_per_year))
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        match &self.directory {
            Some(dir) if !dir.as_os_str().is_empty() => vec![],
            _ => vec![ConfigIssue::error(
                ConfigIssueCode::MissingField {
                    field: "output.directory".to_string(),
                },
                "output.directory: no output directory configured",
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[output]
directory = "/data/amazon"
dir_per_year = true
"#,
        )
        .unwrap();
        let layout = config.output.layout().unwrap();
        assert_eq!(layout.root, PathBuf::from("/data/amazon"));
        assert!(layout.dir_per_year);
    }

    #[test]
    fn test_missing_directory() {
        let config = FileOutputConfig::default();
        assert!(config.layout().is_none());
        assert!(config.validate()[0].is_error());
    }
}
