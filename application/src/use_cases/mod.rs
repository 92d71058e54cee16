//! Use cases
//!
//! Application-level operations that drive the browser through a crawl.

pub mod archive_records;
pub mod context;
pub mod discover_records;
pub mod error;
pub mod retrieve_records;
pub mod session;
