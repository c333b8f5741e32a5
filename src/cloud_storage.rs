//! Cloud block-storage backend
//!
//! Components:
//! - `backend_trait`: the `SnapshotBackend` trait the orchestrator drives.
//! - `types`: volume, snapshot and pagination types.
//! - `digitalocean`: HTTP implementation against the DigitalOcean v2 API.

pub mod backend_trait;
pub mod digitalocean;
pub mod types;

pub use backend_trait::SnapshotBackend;
pub use digitalocean::DigitalOceanClient;
pub use types::{PageOptions, SnapshotPage, SnapshotRecord, Volume};
