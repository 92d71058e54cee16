//! Reference collection with in-run and cross-run deduplication

use super::id::{RecordId, RecordPatterns};
use crate::core::error::DomainError;
use crate::profile::DomainProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A link to one record's invoice page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReference {
    pub href: String,
    pub id: RecordId,
}

/// Outcome of offering one anchor to the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offer {
    /// Queued for retrieval; `rewritten` when the fallback rule replaced the href
    Queued { id: RecordId, rewritten: bool },
    /// Label is not an invoice link label; `label` kept for logging when non-empty
    NotInvoice { label: String },
    /// Already queued earlier in this run
    AlreadySeen(RecordId),
    /// Already on disk from a previous run
    AlreadyPersisted(RecordId),
}

/// Builds the ordered reference list for one run.
///
/// Holds the SeenSet (ids queued this run) and the PersistedSet (ids found in
/// the output store before the run started). Each id is queued at most once.
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    seen: HashSet<RecordId>,
    persisted: HashSet<RecordId>,
    references: Vec<RecordReference>,
}

impl ReferenceCollector {
    pub fn new(persisted: HashSet<RecordId>) -> Self {
        Self {
            persisted,
            ..Self::default()
        }
    }

    /// Offer one anchor (its visible label and href).
    ///
    /// Fails only when an invoice-labelled link carries no parseable id.
    pub fn offer(
        &mut self,
        profile: &DomainProfile,
        patterns: &RecordPatterns,
        label: &str,
        href: &str,
    ) -> Result<Offer, DomainError> {
        let label = label.trim();
        if !profile.is_invoice_label(label) {
            return Ok(Offer::NotInvoice {
                label: label.to_string(),
            });
        }

        let id = patterns.record_id(href)?;
        if self.seen.contains(&id) {
            return Ok(Offer::AlreadySeen(id));
        }
        if self.persisted.contains(&id) {
            return Ok(Offer::AlreadyPersisted(id));
        }

        let rewritten_href = profile
            .fallback_for(label)
            .and_then(|rule| rule.invoice_href(href, id.as_str()));
        let rewritten = rewritten_href.is_some();
        let href = rewritten_href.unwrap_or_else(|| href.to_string());

        self.seen.insert(id.clone());
        self.references.push(RecordReference {
            href,
            id: id.clone(),
        });
        Ok(Offer::Queued { id, rewritten })
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Hand the collected references over, in discovery order
    pub fn into_references(self) -> Vec<RecordReference> {
        self.references
    }
}
