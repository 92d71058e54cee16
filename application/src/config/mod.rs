//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`WaitPolicy`]: polling timeouts, poll interval and retry pacing
//! - [`DiscoveryOptions`]: which record categories and order groups to walk

pub mod discovery_options;
pub mod wait_policy;

pub use discovery_options::DiscoveryOptions;
pub use wait_policy::WaitPolicy;
