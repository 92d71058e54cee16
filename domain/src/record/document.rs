//! Invoice pages: when they are finished rendering, what they must contain,
//! and where they are written.

use super::id::{RecordId, RecordPatterns};
use crate::core::error::DomainError;
use crate::profile::DomainProfile;
use std::path::{Path, PathBuf};

/// File extension of rendered invoice documents
pub const DOCUMENT_EXTENSION: &str = "html";

/// Byte-order mark written ahead of every document
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Render state of an invoice page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// A grand total is shown
    Complete,
    /// The order was cancelled; the page is still a valid document
    Cancelled,
    /// The vendor reports it could not load the order
    Problem,
    /// Still rendering
    Pending,
}

impl DocumentState {
    pub fn classify(profile: &DomainProfile, source: &str) -> Self {
        if source.contains(profile.grand_total) || source.contains(profile.grand_total_digital) {
            DocumentState::Complete
        } else if source.contains(profile.order_cancelled) {
            DocumentState::Cancelled
        } else if source.contains(profile.problem_loading) {
            DocumentState::Problem
        } else {
            DocumentState::Pending
        }
    }

    /// Complete and Cancelled pages can be written
    pub fn is_success(&self) -> bool {
        matches!(self, DocumentState::Complete | DocumentState::Cancelled)
    }
}

/// A verified invoice page ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDocument {
    pub id: RecordId,
    pub year: Option<String>,
    pub content: String,
}

impl RecordDocument {
    /// Check a terminal page source and pull out its year.
    ///
    /// The id must appear in the content, which guards against a stale page
    /// left over from a racing navigation. A year is mandatory when
    /// `require_year` is set.
    pub fn from_page(
        id: RecordId,
        source: String,
        patterns: &RecordPatterns,
        require_year: bool,
    ) -> Result<Self, DomainError> {
        if !source.contains(id.as_str()) {
            return Err(DomainError::RecordIdNotInContent(id.to_string()));
        }
        let year = patterns.year(&source);
        if year.is_none() && require_year {
            return Err(DomainError::MissingRecordDate(id.to_string()));
        }
        Ok(Self {
            id,
            year,
            content: source,
        })
    }

    /// Content as written to disk, led by a byte-order mark
    pub fn to_file_contents(&self) -> String {
        let mut out = String::with_capacity(self.content.len() + BYTE_ORDER_MARK.len_utf8());
        out.push(BYTE_ORDER_MARK);
        out.push_str(&self.content);
        out
    }
}

/// Output directory layout: flat or one directory per year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub dir_per_year: bool,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, dir_per_year: bool) -> Self {
        Self {
            root: root.into(),
            dir_per_year,
        }
    }

    /// `<root>/<id>.html` or `<root>/<year>/<id>.html`
    pub fn path_for(&self, document: &RecordDocument) -> Result<PathBuf, DomainError> {
        let file_name = format!("{}.{}", document.id, DOCUMENT_EXTENSION);
        if !self.dir_per_year {
            return Ok(self.root.join(file_name));
        }
        let year = document
            .year
            .as_deref()
            .ok_or_else(|| DomainError::MissingRecordDate(document.id.to_string()))?;
        Ok(self.root.join(year).join(file_name))
    }

    /// Record id named by an existing file, if any.
    ///
    /// The id is everything before the first `.`, so `<id>.html`,
    /// `<id>.json` and `<id>.invoice.json` all count. Hidden files (including
    /// in-flight temporaries) never do.
    pub fn id_from_path(path: &Path) -> Option<RecordId> {
        let name = path.file_name()?.to_str()?;
        if name.starts_with('.') {
            return None;
        }
        let stem = name.split('.').next()?;
        RecordId::parse(stem)
    }
}
