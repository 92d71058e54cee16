//! Supported vendor locales

use super::{DomainProfile, FallbackRule};
use crate::core::error::DomainError;

const FRESH_FALLBACK: FallbackRule = FallbackRule {
    label: "View order",
    invoice_path: "gp/css/summary/print.html?orderID=",
};

pub const DOT_COM: DomainProfile = DomainProfile {
    vendor: "amazon",
    top_level: "com",
    sign_in: "Sign In",
    sign_out: "Sign Out",
    one_time_code: false,
    your_orders: "Your Orders",
    // View invoice -> regular/digital order, View order -> Amazon Fresh
    invoice_links: &["View order", "View invoice"],
    fallback: Some(FRESH_FALLBACK),
    next_page: "Next",
    archived_group: "Archived Orders",
    digital_orders: Some("Digital Orders"),
    id_parameter: "orderID",
    grand_total: "Grand Total:",
    grand_total_digital: "Grand Total:",
    order_cancelled: "Order Canceled",
    problem_loading: "problem loading this order",
    date_pattern: r"(?:Digital Order:|Order Placed:)(?:\s|<[^>]*>)*[A-Za-z]+\.? \d{1,2}, (\d{4})",
};

pub const DOT_CO_UK: DomainProfile = DomainProfile {
    vendor: "amazon",
    top_level: "co.uk",
    sign_in: "Sign in",
    sign_out: "Sign out",
    one_time_code: false,
    your_orders: "Your Orders",
    invoice_links: &["View order", "View invoice"],
    fallback: Some(FRESH_FALLBACK),
    next_page: "Next",
    archived_group: "Archived Orders",
    digital_orders: None,
    id_parameter: "orderID",
    grand_total: "Grand Total:",
    grand_total_digital: "Grand Total:",
    order_cancelled: "Order Canceled",
    problem_loading: "problem loading this order",
    date_pattern: r"(?:Digital Order:|Order Placed:)(?:\s|<[^>]*>)*(?:\d{1,2} [A-Za-z]+|[A-Za-z]+ \d{1,2},) (\d{4})",
};

pub const DOT_DE: DomainProfile = DomainProfile {
    vendor: "amazon",
    top_level: "de",
    sign_in: "Hallo, Anmelden",
    sign_out: "Abmelden",
    one_time_code: false,
    your_orders: "Meine Bestellungen",
    invoice_links: &["Bestelldetails anzeigen"],
    fallback: None,
    next_page: "Weiter",
    archived_group: "Archivierte Bestellungen",
    digital_orders: None,
    id_parameter: "orderID",
    grand_total: "Gesamtsumme:",
    grand_total_digital: "Endsumme:",
    order_cancelled: "Order Canceled",
    problem_loading: "problem loading this order",
    date_pattern: r"(?:Bestellung aufgegeben am:|Digitale Bestellung:)(?:\s|<[^>]*>)*\d{1,2}\. ?[^\s<\d]+ (\d{4})",
};

pub const PROFILES: [DomainProfile; 3] = [DOT_COM, DOT_CO_UK, DOT_DE];

/// Keys accepted by [`lookup`], with leading dot
pub fn supported_keys() -> Vec<String> {
    PROFILES.iter().map(DomainProfile::key).collect()
}

/// Find the profile for `key`; the leading dot is optional
pub fn lookup(key: &str) -> Result<DomainProfile, DomainError> {
    let wanted = key.trim().trim_start_matches('.').to_ascii_lowercase();
    PROFILES
        .iter()
        .find(|profile| profile.top_level == wanted)
        .cloned()
        .ok_or_else(|| DomainError::UnsupportedDomain {
            key: key.to_string(),
            supported: supported_keys(),
        })
}
