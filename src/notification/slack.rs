use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::configuration::types::NotificationSettings;
use crate::error_handling::types::NotificationError;
use crate::notification::notifier_trait::Notifier;
use crate::notification::types::Severity;

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    attachments: [Attachment<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Attachment<'a> {
    fallback: &'a str,
    color: &'static str,
    text: &'a str,
    footer: &'static str,
    ts: i64,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts notifications to a Slack channel through `chat.postMessage`.
pub struct SlackNotifier {
    http_client: Client,
    api_url: String,
    token: String,
    channel_id: String,
}

impl SlackNotifier {
    pub fn new(settings: &NotificationSettings) -> Result<Self, NotificationError> {
        let http_client = Client::builder()
            .user_agent(concat!("snapshotter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            channel_id: settings.channel_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, message: &str, severity: Severity) -> Result<(), NotificationError> {
        let body = PostMessage {
            channel: &self.channel_id,
            attachments: [Attachment {
                fallback: message,
                color: severity.color(),
                text: message,
                footer: "snapshotter",
                ts: Utc::now().timestamp(),
            }],
        };

        debug!("Posting {} notification to Slack channel {}", severity, self.channel_id);
        let response: PostMessageResponse = self
            .http_client
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Slack answers API-level failures with HTTP 200 and `ok: false`
        if !response.ok {
            return Err(NotificationError::Rejected(
                response.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(())
    }
}
