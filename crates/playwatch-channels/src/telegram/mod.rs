//! Telegram Bot API channel.
//!
//! Receives commands via long polling (`getUpdates`) or a webhook, and
//! sends with `sendMessage`.
//! Docs: <https://core.telegram.org/bots/api>

mod polling;
pub(crate) mod send;
pub(crate) mod types;
mod webhook;


use async_trait::async_trait;
use playwatch_core::{
    config::{TelegramConfig, UpdateMode},
    error::PlaywatchError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};
use types::TgUpdate;
use uuid::Uuid;

/// Telegram channel using the Bot API.
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
    base_url: String,
    /// Tracks the last update_id to avoid reprocessing.
    last_update_id: Arc<Mutex<Option<i64>>>,
}

impl TelegramChannel {
    /// Create a new Telegram channel from config.
    pub fn new(config: TelegramConfig) -> Self {
        let base_url = format!("https://api.telegram.org/bot{}", config.bot_token);
        Self {
            config,
            client: reqwest::Client::new(),
            base_url,
            last_update_id: Arc::new(Mutex::new(None)),
        }
    }

    pub fn mode(&self) -> UpdateMode {
        self.config.mode
    }
}

/// Turn a raw update into an incoming message.
///
/// Only text messages from allowed users are kept (empty allow-list = everyone).
pub(crate) fn incoming_from_update(
    update: TgUpdate,
    allowed_users: &[i64],
) -> Option<IncomingMessage> {
    let msg = update.message?;
    let text = msg.text?;
    let user = msg.from?;

    if !allowed_users.is_empty() && !allowed_users.contains(&user.id) {
        warn!("ignoring message from unauthorized user {}", user.id);
        return None;
    }

    let is_group = matches!(msg.chat.chat_type.as_str(), "group" | "supergroup");
    if is_group {
        debug!("telegram: group message in chat {}", msg.chat.id);
    }

    let sender_name = if let Some(ref un) = user.username {
        format!("@{un}")
    } else if let Some(ref ln) = user.last_name {
        format!("{} {ln}", user.first_name)
    } else {
        user.first_name.clone()
    };

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender_id: user.id.to_string(),
        sender_name: Some(sender_name),
        text,
        timestamp: chrono::Utc::now(),
        reply_target: Some(msg.chat.id.to_string()),
        is_group,
    })
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, PlaywatchError> {
        match self.config.mode {
            UpdateMode::Polling => self.start_polling().await,
            UpdateMode::Webhook => self.start_webhook().await,
        }
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), PlaywatchError> {
        let chat_id_str = message
            .reply_target
            .as_deref()
            .ok_or_else(|| PlaywatchError::Channel("no reply_target on outgoing message".into()))?;

        let chat_id: i64 = chat_id_str.parse().map_err(|e| {
            PlaywatchError::Channel(format!("invalid telegram chat_id '{chat_id_str}': {e}"))
        })?;

        self.send_text(chat_id, &message.text).await
    }

    async fn register_commands(&self, commands: &[(String, String)]) {
        self.set_my_commands(commands).await;
    }

    async fn stop(&self) -> Result<(), PlaywatchError> {
        if self.config.mode == UpdateMode::Webhook {
            self.delete_webhook().await;
        }
        info!("Telegram channel stopped");
        Ok(())
    }
}
