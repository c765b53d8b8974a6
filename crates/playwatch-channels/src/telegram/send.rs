//! Message sending, command registration, and webhook management.

use super::types::TgResponse;
use super::TelegramChannel;
use crate::utils::split_message;
use playwatch_core::error::PlaywatchError;
use tracing::{info, warn};

/// Telegram's maximum message length.
const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a plain text message to a specific chat.
    pub(crate) async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), PlaywatchError> {
        let url = format!("{}/sendMessage", self.base_url);

        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| PlaywatchError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(PlaywatchError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn set_my_commands(&self, commands: &[(String, String)]) {
        let commands: Vec<serde_json::Value> = commands
            .iter()
            .map(|(name, description)| {
                serde_json::json!({ "command": name, "description": description })
            })
            .collect();
        let body = serde_json::json!({ "commands": commands });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }

    /// Point Telegram at our webhook endpoint.
    pub(crate) async fn set_webhook(&self, url: &str, secret: &str) -> Result<(), PlaywatchError> {
        let mut body = serde_json::json!({
            "url": url,
            "allowed_updates": ["message"],
        });
        if !secret.is_empty() {
            body["secret_token"] = serde_json::Value::String(secret.to_string());
        }

        let resp: TgResponse<bool> = self
            .client
            .post(format!("{}/setWebhook", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| PlaywatchError::Channel(format!("telegram setWebhook failed: {e}")))?
            .json()
            .await
            .map_err(|e| {
                PlaywatchError::Channel(format!("telegram setWebhook parse failed: {e}"))
            })?;

        if !resp.ok {
            return Err(PlaywatchError::Channel(format!(
                "telegram setWebhook rejected: {}",
                resp.description.unwrap_or_default()
            )));
        }
        info!("registered Telegram webhook at {url}");
        Ok(())
    }

    /// Remove any registered webhook. Best-effort.
    pub(crate) async fn delete_webhook(&self) {
        let url = format!("{}/deleteWebhook", self.base_url);
        match self.client.post(&url).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to delete Telegram webhook: {body}");
            }
            Err(e) => warn!("failed to delete Telegram webhook: {e}"),
        }
    }
}
