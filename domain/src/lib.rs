//! Domain layer for invoice-harvest
//!
//! This crate contains the vendor profiles, record identities and page rules.
//! It has no dependencies on browsers, file systems or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Domain Profile
//!
//! A static, per-locale table of UI text and feature flags
//! ([`DomainProfile`]). The crawler's logic is locale-agnostic; everything
//! that differs between `amazon.com` and `amazon.de` lives here.
//!
//! ## Records
//!
//! - **RecordId**: a vendor order id, used to deduplicate and to name files
//! - **ReferenceCollector**: the SeenSet/PersistedSet filter producing the
//!   ordered list of invoice links to retrieve
//! - **RecordDocument**: a verified invoice page and where it belongs on disk

pub mod auth;
pub mod core;
pub mod navigation;
pub mod profile;
pub mod record;
pub mod validation;

// Re-export commonly used types
pub use auth::{LoginStage, SessionState};
pub use crate::core::error::DomainError;
pub use navigation::{locator::Locator, url_guard::UrlGuard};
pub use profile::{DomainProfile, FallbackRule, tables};
pub use record::{
    DocumentState, Offer, OutputLayout, RecordDocument, RecordId, RecordPatterns,
    RecordReference, ReferenceCollector,
};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
