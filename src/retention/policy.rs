use chrono::NaiveDateTime;

use crate::cloud_storage::types::SnapshotRecord;
use crate::error_handling::types::RetentionError;

/// Format of the backend's `created_at` field, always UTC.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Snapshots chosen for deletion, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionDecision {
    pub to_delete: Vec<SnapshotRecord>,
    pub retained: usize,
}

impl RetentionDecision {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.to_delete.iter().map(|s| s.id.as_str()).collect()
    }
}

pub fn parse_created_at(snapshot: &SnapshotRecord) -> Result<NaiveDateTime, RetentionError> {
    NaiveDateTime::parse_from_str(&snapshot.created_at, CREATED_AT_FORMAT).map_err(|source| {
        RetentionError::TimestampParse {
            snapshot_id: snapshot.id.clone(),
            value: snapshot.created_at.clone(),
            source,
        }
    })
}

/// Picks the snapshots to delete so that at most `keep` remain.
///
/// Every timestamp is parsed up front; one unparseable value fails the whole
/// decision. The sort is stable, so snapshots sharing a timestamp stay in the
/// order the backend returned them.
pub fn select_for_deletion(
    snapshots: &[SnapshotRecord],
    keep: usize,
) -> Result<RetentionDecision, RetentionError> {
    let mut dated = snapshots
        .iter()
        .map(|snapshot| parse_created_at(snapshot).map(|created| (created, snapshot)))
        .collect::<Result<Vec<_>, _>>()?;

    let excess = snapshots.len().saturating_sub(keep);
    if excess == 0 {
        return Ok(RetentionDecision {
            to_delete: Vec::new(),
            retained: snapshots.len(),
        });
    }

    dated.sort_by_key(|(created, _)| *created);

    Ok(RetentionDecision {
        to_delete: dated
            .into_iter()
            .take(excess)
            .map(|(_, snapshot)| snapshot.clone())
            .collect(),
        retained: keep,
    })
}
