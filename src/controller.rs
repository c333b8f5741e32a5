//! Snapshot orchestration.
//!
//! Re-exports:
//! - [`Controller`]: runs the per-volume snapshot and prune workflow.
//! - [`RunContext`]: backend and notifier handles shared by a run.
//! - [`RunSummary`]: counters of a successful run.

pub mod controller_handler;

pub use controller_handler::{Controller, RunContext, RunSummary, LIST_PAGE_SIZE};
