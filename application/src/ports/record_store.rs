//! Record store port
//!
//! The output store doubles as the cross-run dedup index: any record whose
//! id names an existing file has already been retrieved.

use harvest_domain::{DomainError, OutputLayout, RecordDocument, RecordId};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the output store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot scan {path}: {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("Layout error: {0}")]
    Layout(#[from] DomainError),
}

/// Persistent home of retrieved records
pub trait RecordStore: Send + Sync {
    /// Where and how documents are laid out
    fn layout(&self) -> &OutputLayout;

    /// Create the output root if it does not exist
    fn prepare(&self) -> Result<(), StoreError>;

    /// Ids already present in the store (the PersistedSet)
    fn persisted_ids(&self) -> Result<HashSet<RecordId>, StoreError>;

    /// Write a document atomically, returning its final path
    fn write(&self, document: &RecordDocument) -> Result<PathBuf, StoreError>;
}
