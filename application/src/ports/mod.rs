//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod browser;
pub mod progress;
pub mod record_store;
pub mod secrets;
