//! Snapshot backend trait
//!
//! This module defines the `SnapshotBackend` trait, the interface to the cloud
//! block-storage API that owns volumes and their snapshots.
//!
//! Implementors are responsible for:
//! - Resolving volumes by identifier
//! - Creating snapshots of a volume
//! - Listing the snapshots of a volume, one page at a time
//! - Deleting snapshots
//!
//! Every call is a single attempt; implementations must not retry.

use crate::cloud_storage::types::{PageOptions, SnapshotPage, SnapshotRecord, Volume};
use crate::error_handling::types::BackendError;
use async_trait::async_trait;

#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    /// Looks a volume up by its identifier.
    async fn get_volume(&self, volume_id: &str) -> Result<Volume, BackendError>;

    /// Requests a new snapshot of `volume_id` called `name`.
    async fn create_snapshot(
        &self,
        volume_id: &str,
        name: &str,
    ) -> Result<SnapshotRecord, BackendError>;

    /// Returns one page of the snapshots taken from `volume_id`.
    async fn list_snapshots(
        &self,
        volume_id: &str,
        page: PageOptions,
    ) -> Result<SnapshotPage, BackendError>;

    /// Permanently deletes a snapshot.
    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), BackendError>;
}
