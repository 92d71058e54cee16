//! Discovery options: which parts of the order history to walk.

use serde::{Deserialize, Serialize};

/// Record categories and order groups to traverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    /// Walk the regular order history
    pub regular: bool,
    /// Walk the digital orders section (ignored when the locale has none)
    pub digital: bool,
    /// Restrict traversal to these order groups, e.g. `"2020"` or `"past 3 months"`
    pub order_groups: Option<Vec<String>>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            regular: true,
            digital: false,
            order_groups: None,
        }
    }
}

impl DiscoveryOptions {
    pub fn with_digital(mut self, digital: bool) -> Self {
        self.digital = digital;
        self
    }

    pub fn with_regular(mut self, regular: bool) -> Self {
        self.regular = regular;
        self
    }

    pub fn with_order_groups(mut self, groups: Vec<String>) -> Self {
        self.order_groups = Some(groups);
        self
    }

    /// Whether the order group named `name` should be traversed
    pub fn allows_group(&self, name: &str) -> bool {
        self.order_groups
            .as_ref()
            .is_none_or(|groups| groups.iter().any(|g| g == name))
    }
}
