//! Record stores
//!
//! File-system implementation of [`RecordStore`](harvest_application::RecordStore).

mod file_store;

pub use file_store::FileRecordStore;
