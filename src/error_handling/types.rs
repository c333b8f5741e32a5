use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Arguments(#[from] clap::Error),
    #[error("Environment variable \"{0}\" is set but empty")]
    EmptyValue(&'static str),
    #[error("Volume list is empty: set DO_VOLUMES to a comma-separated list of volume ids")]
    EmptyVolumeList,
    #[error("Missing environment variable \"{missing}\" (required when \"{present}\" is set)")]
    IncompleteNotification {
        present: &'static str,
        missing: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Backend API error ({status}) {id}: {message}")]
    Api {
        status: u16,
        id: String,
        message: String,
    },
    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("Snapshot {snapshot_id} has an unparseable creation time \"{value}\": {source}")]
    TimestampParse {
        snapshot_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Notification rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Failed to spawn success command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Success command failed: {0}")]
    Failed(ExitReason),
}

/// How a completion command ended when it did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Code(i32),
    Signal,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Code(code) => write!(f, "exit status {}", code),
            ExitReason::Signal => write!(f, "terminated by signal"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
}

/// Severity class of a [`RunError`].
///
/// `Local` errors are failures that only abort the remaining pruning work; they
/// still end the run as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Fatal,
    Local,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Unable to resolve volume {volume_id}: {source}")]
    ResolveVolume {
        volume_id: String,
        #[source]
        source: BackendError,
    },
    #[error("Unable to create snapshot for volume {volume_id}: {source}")]
    CreateSnapshot {
        volume_id: String,
        #[source]
        source: BackendError,
    },
    #[error("Unable to list snapshots for volume {volume_id}: {source}")]
    ListSnapshots {
        volume_id: String,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    Retention(#[from] RetentionError),
    #[error("Unable to delete snapshot {snapshot_id}: {source}")]
    DeleteSnapshot {
        snapshot_id: String,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    CompletionHook(#[from] HookError),
}

impl RunError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RunError::DeleteSnapshot { .. } => ErrorClass::Local,
            _ => ErrorClass::Fatal,
        }
    }
}
