//! Operator notifications.
//!
//! Re-exports:
//! - [`Notifier`]: trait implemented by every channel.
//! - [`SlackNotifier`]: Slack Web API channel.
//! - [`NoopNotifier`]: stands in when no channel is configured.
//! - [`notify`]: best-effort send used by the orchestrator.

pub mod notifier_trait;
pub mod slack;
pub mod types;

pub use notifier_trait::{notify, NoopNotifier, Notifier};
pub use slack::SlackNotifier;
pub use types::Severity;
