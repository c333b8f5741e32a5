/// Credentials and target of the chat notification channel.
///
/// Only built when both the token and the channel id are configured.
#[derive(Debug, PartialEq, Clone)]
pub struct NotificationSettings {
    pub token: String,
    pub channel_id: String,
    pub api_url: String,
}

/// Connection settings for the block-storage API.
#[derive(Debug, PartialEq, Clone)]
pub struct BackendSettings {
    pub token: String,
    pub api_url: String,
}
