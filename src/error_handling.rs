//! Error types shared across the snapshotter subsystems.

pub mod types;

pub use types::*;
