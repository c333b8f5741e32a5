use chrono::Local;
use log::{debug, info};

use crate::cloud_storage::{
    DigitalOceanClient, PageOptions, SnapshotBackend, SnapshotRecord, Volume,
};
use crate::completion_hook::CompletionHook;
use crate::configuration::config::Config;
use crate::error_handling::types::*;
use crate::notification::{notify, NoopNotifier, Notifier, Severity, SlackNotifier};
use crate::retention::{select_for_deletion, RetentionDecision};

/// Page size requested when listing snapshots. Listing keeps requesting pages
/// while the backend reports a next one.
pub const LIST_PAGE_SIZE: u32 = 100;

/// Local-time format used to name new snapshots.
pub const SNAPSHOT_NAME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Collaborators shared by every step of a run.
///
/// Built once before the first volume is touched and only borrowed afterwards.
pub struct RunContext {
    backend: Box<dyn SnapshotBackend>,
    notifier: Box<dyn Notifier>,
}

impl RunContext {
    pub fn new(backend: Box<dyn SnapshotBackend>, notifier: Box<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    /// Builds the DigitalOcean backend and, when configured, the Slack notifier.
    pub fn from_config(config: &Config) -> Result<Self, ControllerError> {
        let backend = DigitalOceanClient::new(&config.backend()).map_err(|e| {
            ControllerError::InitializationFailed(format!("backend client: {}", e))
        })?;

        let notifier: Box<dyn Notifier> = match config.notification() {
            Some(settings) => Box::new(SlackNotifier::new(&settings).map_err(|e| {
                ControllerError::InitializationFailed(format!("Slack client: {}", e))
            })?),
            None => Box::new(NoopNotifier),
        };

        Ok(Self::new(Box::new(backend), notifier))
    }

    pub fn backend(&self) -> &dyn SnapshotBackend {
        self.backend.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

/// Counters of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub volumes_processed: usize,
    pub snapshots_created: usize,
    pub snapshots_deleted: usize,
}

/// Drives the snapshot-then-prune workflow over the configured volumes.
pub struct Controller {
    context: RunContext,
    volume_ids: Vec<String>,
    retention_count: usize,
    completion_hook: Option<CompletionHook>,
}

impl Controller {
    pub fn new(
        context: RunContext,
        volume_ids: Vec<String>,
        retention_count: usize,
        completion_hook: Option<CompletionHook>,
    ) -> Self {
        Self {
            context,
            volume_ids,
            retention_count,
            completion_hook,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ControllerError> {
        let context = RunContext::from_config(config)?;
        Ok(Self::new(
            context,
            config.volume_ids(),
            config.retention_count(),
            config.success_command().map(CompletionHook::new),
        ))
    }

    /// Processes every volume in order, then reports success and runs the
    /// completion hook.
    ///
    /// The first error stops the run; work already done on earlier volumes
    /// stays in place. The success notification goes out before the hook
    /// runs, so a failing hook still follows a success message.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();

        for volume_id in &self.volume_ids {
            let deleted = self.process_volume(volume_id).await?;
            summary.volumes_processed += 1;
            summary.snapshots_created += 1;
            summary.snapshots_deleted += deleted;
        }

        notify(
            self.context.notifier(),
            &format!(
                "Successfully created snapshots for {} volumes",
                self.volume_ids.len()
            ),
            Severity::Info,
        )
        .await;

        if let Some(hook) = &self.completion_hook {
            hook.run().await?;
        }

        debug!(
            "Run finished: {} volumes, {} snapshots created, {} deleted",
            summary.volumes_processed, summary.snapshots_created, summary.snapshots_deleted
        );
        Ok(summary)
    }

    /// Sends `err` to the notification channel at error severity.
    pub async fn report_failure(&self, err: &RunError) {
        notify(self.context.notifier(), &err.to_string(), Severity::Error).await;
    }

    /// Snapshots one volume and prunes it. Returns the number of deletions.
    async fn process_volume(&self, volume_id: &str) -> Result<usize, RunError> {
        let backend = self.context.backend();

        let volume = backend
            .get_volume(volume_id)
            .await
            .map_err(|source| RunError::ResolveVolume {
                volume_id: volume_id.to_string(),
                source,
            })?;

        let name = Local::now().format(SNAPSHOT_NAME_FORMAT).to_string();
        let snapshot = backend
            .create_snapshot(&volume.id, &name)
            .await
            .map_err(|source| RunError::CreateSnapshot {
                volume_id: volume.id.clone(),
                source,
            })?;
        info!(
            "Created Snapshot with Id {} from volume {}",
            snapshot.id, volume.name
        );

        let snapshots = self.list_all_snapshots(&volume).await?;
        if snapshots.len() <= self.retention_count {
            debug!(
                "Volume {} has {} snapshots, nothing to prune (keeping {})",
                volume.id,
                snapshots.len(),
                self.retention_count
            );
            return Ok(0);
        }

        let decision = select_for_deletion(&snapshots, self.retention_count)?;
        self.prune(&decision).await
    }

    async fn list_all_snapshots(&self, volume: &Volume) -> Result<Vec<SnapshotRecord>, RunError> {
        let mut snapshots = Vec::new();
        let mut page = PageOptions::first(LIST_PAGE_SIZE);

        loop {
            let result = self
                .context
                .backend()
                .list_snapshots(&volume.id, page)
                .await
                .map_err(|source| RunError::ListSnapshots {
                    volume_id: volume.id.clone(),
                    source,
                })?;

            let fetched = result.snapshots.len();
            snapshots.extend(result.snapshots);
            // An empty page that still claims a successor would loop forever
            if !result.has_next || fetched == 0 {
                break;
            }
            page = page.next();
        }

        debug!("Volume {} has {} snapshots", volume.id, snapshots.len());
        Ok(snapshots)
    }

    /// Deletes in decision order and stops at the first failure.
    async fn prune(&self, decision: &RetentionDecision) -> Result<usize, RunError> {
        let mut deleted = 0;
        for snapshot in &decision.to_delete {
            self.context
                .backend()
                .delete_snapshot(&snapshot.id)
                .await
                .map_err(|source| RunError::DeleteSnapshot {
                    snapshot_id: snapshot.id.clone(),
                    source,
                })?;
            info!("Deleted Snapshot with Id {}", snapshot.id);
            deleted += 1;
        }
        Ok(deleted)
    }
}
