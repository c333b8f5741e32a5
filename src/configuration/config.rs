use super::types::*;
use crate::error_handling::types::ConfigError;
use clap::Parser;
use std::ffi::OsString;

pub const DEFAULT_DO_API_URL: &str = "https://api.digitalocean.com";
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Runtime configuration of a snapshot run.
///
/// Every value can be given either as a long command-line flag or through the
/// environment variable named in its `env` attribute. The environment is the
/// usual source when the binary runs from a scheduler.
///
/// # Examples
///
/// ```no_run
/// use snapshotter::configuration::config::Config;
///
/// let config = Config::load().expect("invalid configuration");
/// println!("Volumes: {:?}", config.volume_ids());
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "snapshotter")]
#[command(version)]
#[command(about = "Snapshots block-storage volumes and prunes old snapshots")]
pub struct Config {
    /// API token for the block-storage backend
    #[arg(long, env = "DO_TOKEN", hide_env_values = true)]
    do_token: String,

    /// Comma-separated list of volume identifiers
    ///
    /// Volumes are processed in the order given. Whitespace around each id is
    /// ignored, as are empty entries.
    #[arg(long, env = "DO_VOLUMES")]
    volumes: String,

    /// Maximum number of snapshots to keep per volume
    #[arg(long, env = "DO_SNAPSHOT_COUNT")]
    snapshot_count: usize,

    /// Slack bot token, enables notifications when set
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    slack_token: Option<String>,

    /// Slack channel receiving the notifications
    #[arg(long, env = "SLACK_CHANNEL_ID")]
    slack_channel_id: Option<String>,

    /// Shell command executed after every volume succeeded
    #[arg(long, env = "SUCCESS_COMMAND")]
    success_command: Option<String>,

    /// Base URL of the block-storage API
    #[arg(long, env = "DO_API_URL", default_value = DEFAULT_DO_API_URL)]
    do_api_url: String,

    /// Base URL of the Slack Web API
    #[arg(long, env = "SLACK_API_URL", default_value = DEFAULT_SLACK_API_URL)]
    slack_api_url: String,
}

impl Config {
    /// Reads the configuration from the process arguments and environment.
    ///
    /// Missing required values, a non-integer retention count, an empty volume
    /// list or a half-configured notification channel are all reported as a
    /// [`ConfigError`] before anything talks to the backend.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Config::load`] but with an explicit argument list. The
    /// environment is still consulted for values missing from `args`.
    pub fn load_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut config = Config::try_parse_from(args)?;
        config.slack_token = non_blank(config.slack_token.take());
        config.slack_channel_id = non_blank(config.slack_channel_id.take());
        config.success_command = non_blank(config.success_command.take());
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.do_token.trim().is_empty() {
            return Err(ConfigError::EmptyValue("DO_TOKEN"));
        }
        if self.volume_ids().is_empty() {
            return Err(ConfigError::EmptyVolumeList);
        }

        match (&self.slack_token, &self.slack_channel_id) {
            (Some(_), None) => Err(ConfigError::IncompleteNotification {
                present: "SLACK_TOKEN",
                missing: "SLACK_CHANNEL_ID",
            }),
            (None, Some(_)) => Err(ConfigError::IncompleteNotification {
                present: "SLACK_CHANNEL_ID",
                missing: "SLACK_TOKEN",
            }),
            _ => Ok(()),
        }
    }

    pub fn volume_ids(&self) -> Vec<String> {
        self.volumes
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn retention_count(&self) -> usize {
        self.snapshot_count
    }

    pub fn backend(&self) -> BackendSettings {
        BackendSettings {
            token: self.do_token.clone(),
            api_url: self.do_api_url.clone(),
        }
    }

    pub fn notification(&self) -> Option<NotificationSettings> {
        match (&self.slack_token, &self.slack_channel_id) {
            (Some(token), Some(channel_id)) => Some(NotificationSettings {
                token: token.clone(),
                channel_id: channel_id.clone(),
                api_url: self.slack_api_url.clone(),
            }),
            _ => None,
        }
    }

    pub fn success_command(&self) -> Option<&str> {
        self.success_command.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
