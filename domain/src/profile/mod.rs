//! Per-locale vendor profiles
//!
//! A [`DomainProfile`] is the static table of UI text, locator inputs and
//! feature flags the crawler needs for one vendor locale. Profiles are plain
//! data; the supported set lives in [`tables`] and is selected by top-level
//! domain key.

mod locators;
pub mod tables;

use crate::core::error::DomainError;
use crate::navigation::url_guard::UrlGuard;
use serde::Serialize;

pub use locators::{ORDER_FILTER, REMEMBER_ME};

/// Rewrite rule for invoice links that point at an order summary instead of
/// the printable invoice (Amazon Fresh orders on `.com` and `.co.uk`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FallbackRule {
    /// Link label marking such orders
    pub label: &'static str,
    /// Path and query appended to the site origin; the order id follows it
    pub invoice_path: &'static str,
}

impl FallbackRule {
    /// Canonical invoice URL for `id` on the origin of `href`
    pub fn invoice_href(&self, href: &str, id: &str) -> Option<String> {
        let url = url::Url::parse(href).ok()?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return None;
        }
        Some(format!(
            "{}/{}{}",
            origin.ascii_serialization(),
            self.invoice_path,
            id
        ))
    }
}

/// Immutable UI description of one vendor locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainProfile {
    /// Second-level vendor name (`amazon` in `www.amazon.de`)
    pub vendor: &'static str,
    /// Top-level domain without the leading dot (`de`, `co.uk`)
    pub top_level: &'static str,

    // Login
    pub sign_in: &'static str,
    pub sign_out: &'static str,
    /// Whether login continues with a one-time code after the password
    pub one_time_code: bool,

    // Finding invoices
    pub your_orders: &'static str,
    pub invoice_links: &'static [&'static str],
    pub fallback: Option<FallbackRule>,
    pub next_page: &'static str,
    pub archived_group: &'static str,
    /// Label of the digital orders link; `None` when the locale has no such section
    pub digital_orders: Option<&'static str>,
    /// Query parameter carrying the order id in invoice links
    pub id_parameter: &'static str,

    // Confirming the invoice page
    pub grand_total: &'static str,
    pub grand_total_digital: &'static str,
    pub order_cancelled: &'static str,
    pub problem_loading: &'static str,
    /// Regex whose first capture group is the four-digit order year
    pub date_pattern: &'static str,
}

impl DomainProfile {
    /// Look up a profile by key, e.g. `.de` or `co.uk`
    pub fn lookup(key: &str) -> Result<Self, DomainError> {
        tables::lookup(key)
    }

    /// Enable or disable the one-time-code login stage
    pub fn with_one_time_code(mut self, enabled: bool) -> Self {
        self.one_time_code = enabled;
        self
    }

    /// Profile key with leading dot, as used in configuration
    pub fn key(&self) -> String {
        format!(".{}", self.top_level)
    }

    pub fn home_url(&self) -> String {
        format!("https://www.{}.{}", self.vendor, self.top_level)
    }

    pub fn url_guard(&self) -> Result<UrlGuard, DomainError> {
        UrlGuard::new(self.vendor, self.top_level)
    }

    pub fn has_digital_orders(&self) -> bool {
        self.digital_orders.is_some()
    }

    pub fn is_invoice_label(&self, label: &str) -> bool {
        self.invoice_links.contains(&label)
    }

    /// The fallback rule, if `label` is this locale's fallback label
    pub fn fallback_for(&self, label: &str) -> Option<&FallbackRule> {
        self.fallback.as_ref().filter(|rule| rule.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_url() {
        assert_eq!(
            DomainProfile::lookup(".co.uk").unwrap().home_url(),
            "https://www.amazon.co.uk"
        );
    }

    #[test]
    fn test_with_one_time_code() {
        let profile = DomainProfile::lookup(".com").unwrap();
        assert!(!profile.one_time_code);
        assert!(profile.with_one_time_code(true).one_time_code);
    }

    #[test]
    fn test_fallback_rewrites_to_origin() {
        let profile = DomainProfile::lookup(".com").unwrap();
        let rule = profile.fallback_for("View order").unwrap();
        let href = "https://www.amazon.com/gp/your-account/order-details/ref=ppx_yo_dt_b_order_details_o00?ie=UTF8&orderID=113-1234567-1234567";
        assert_eq!(
            rule.invoice_href(href, "113-1234567-1234567").unwrap(),
            "https://www.amazon.com/gp/css/summary/print.html?orderID=113-1234567-1234567"
        );
    }

    #[test]
    fn test_fallback_only_for_its_label() {
        let profile = DomainProfile::lookup(".com").unwrap();
        assert!(profile.fallback_for("View invoice").is_none());
        let de = DomainProfile::lookup(".de").unwrap();
        assert!(de.fallback_for("View order").is_none());
    }

    #[test]
    fn test_fallback_rejects_relative_href() {
        let profile = DomainProfile::lookup(".com").unwrap();
        let rule = profile.fallback.unwrap();
        assert!(rule.invoice_href("/gp/order?orderID=1", "1").is_none());
    }

    #[test]
    fn test_profile_serializes_for_display() {
        let profile = DomainProfile::lookup(".de").unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["top_level"], "de");
        assert_eq!(json["invoice_links"][0], "Bestelldetails anzeigen");
    }
}
