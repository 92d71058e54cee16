//! Progress notification port
//!
//! Defines the interface for reporting progress during an archive run.

use harvest_domain::{LoginStage, RecordId};
use std::path::Path;

/// Callback for progress updates during an archive run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing).
pub trait ArchiveProgress: Send + Sync {
    /// Called once discovery has produced the full reference list
    fn on_discovery_complete(&self, total: usize);

    /// Called before an invoice page is retrieved
    fn on_record_start(&self, id: &RecordId);

    /// Called after an invoice has been written
    fn on_record_written(&self, id: &RecordId, path: &Path);

    // ==================== Optional Callbacks ====================

    /// Called on every login stage transition
    fn on_login_stage(&self, _stage: LoginStage) {}

    /// Called when traversal enters an order group
    fn on_order_group(&self, _name: &str) {}

    /// Called when an order is queued for retrieval
    fn on_record_found(&self, _id: &RecordId) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ArchiveProgress for NoProgress {
    fn on_discovery_complete(&self, _total: usize) {}
    fn on_record_start(&self, _id: &RecordId) {}
    fn on_record_written(&self, _id: &RecordId, _path: &Path) {}
}
