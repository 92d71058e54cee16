//! Records: vendor-issued ids, references to their invoice pages, and the
//! documents written for them.

pub mod collector;
pub mod document;
pub mod id;

pub use collector::{Offer, RecordReference, ReferenceCollector};
pub use document::{DocumentState, OutputLayout, RecordDocument};
pub use id::{RecordId, RecordPatterns};
