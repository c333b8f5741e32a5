pub mod app;

pub mod cloud_storage;
pub use cloud_storage::{DigitalOceanClient, SnapshotBackend};

pub mod completion_hook;
pub use completion_hook::CompletionHook;

pub mod configuration;
pub use configuration::Config;

pub mod controller;
pub use controller::{Controller, RunContext, RunSummary};

pub mod error_handling;

pub mod notification;
pub use notification::{NoopNotifier, Notifier, SlackNotifier};

pub mod retention;
