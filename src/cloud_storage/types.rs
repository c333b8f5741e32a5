use serde::{Deserialize, Serialize};

/// Block-storage volume as reported by the backend. Read-only for us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size_gigabytes: Option<f64>,
}

/// A point-in-time snapshot of a volume.
///
/// `created_at` is kept in the backend's textual form; the retention policy
/// parses it when ordering snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Identifier of the volume the snapshot was taken from.
    #[serde(default)]
    pub resource_id: String,
    pub created_at: String,
}

/// Pagination request for snapshot listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub page: u32,
    pub per_page: u32,
}

impl PageOptions {
    pub fn first(per_page: u32) -> Self {
        Self { page: 1, per_page }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }
}

/// One page of a snapshot listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPage {
    pub snapshots: Vec<SnapshotRecord>,
    /// `true` when the backend reports another page after this one.
    pub has_next: bool,
}
