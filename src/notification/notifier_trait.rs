//! Notifier trait
//!
//! A `Notifier` delivers one message per call to an operator-facing channel.
//! Delivery is best effort: callers go through [`notify`], which logs a failed
//! send and carries on, so a broken channel never changes the outcome of a run.

use crate::error_handling::types::NotificationError;
use crate::notification::types::Severity;
use async_trait::async_trait;
use log::{debug, error};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends exactly one message to the channel.
    async fn send(&self, message: &str, severity: Severity) -> Result<(), NotificationError>;
}

/// Notifier used when no channel is configured. Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, message: &str, severity: Severity) -> Result<(), NotificationError> {
        debug!("No notification channel, dropping {} message: {}", severity, message);
        Ok(())
    }
}

/// Sends `message` and logs, rather than returns, any delivery failure.
pub async fn notify(notifier: &dyn Notifier, message: &str, severity: Severity) {
    if let Err(e) = notifier.send(message, severity).await {
        error!("Error while trying to send notification: {}", e);
    }
}
