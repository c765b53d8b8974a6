use serde::{Deserialize, Serialize};

use super::defaults::*;

/// How the bot receives Telegram updates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Long polling via `getUpdates` (default).
    #[default]
    Polling,
    /// Telegram pushes updates to a public HTTPS endpoint.
    Webhook,
}

/// Telegram bot config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Falls back to the `TELEGRAM_BOT_TOKEN` env var when empty.
    #[serde(default)]
    pub bot_token: String,
    /// Group or private chat that receives change notifications.
    #[serde(default)]
    pub chat_id: Option<i64>,
    /// Users allowed to run commands. Empty = allow all.
    #[serde(default)]
    pub allowed_users: Vec<i64>,
    #[serde(default)]
    pub mode: UpdateMode,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// Webhook listener settings (only used in webhook mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Local address the HTTP listener binds to.
    #[serde(default = "default_webhook_listen")]
    pub listen: String,
    /// Public HTTPS base URL Telegram should call (e.g. `https://bot.example.com`).
    #[serde(default)]
    pub public_url: String,
    #[serde(default = "default_webhook_path")]
    pub path: String,
    /// Sent by Telegram in `X-Telegram-Bot-Api-Secret-Token`. Empty = not checked.
    #[serde(default)]
    pub secret_token: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            listen: default_webhook_listen(),
            public_url: String::new(),
            path: default_webhook_path(),
            secret_token: String::new(),
        }
    }
}
