//! Snapshot retention policy.
//!
//! Given the snapshots of one volume and a keep-count, decides which of them
//! to delete: the oldest ones, until only `keep` are left.

pub mod policy;

pub use policy::{select_for_deletion, RetentionDecision, CREATED_AT_FORMAT};
