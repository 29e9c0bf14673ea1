//! Group & live-presentation domain engine.
//!
//! The store is the only shared mutable resource; poll results, analytics
//! and reports are pure read-time derivations over store snapshots.

pub mod events;
pub mod ids;
pub mod performance;
pub mod poll;
pub mod report;
pub mod store;
pub mod types;
