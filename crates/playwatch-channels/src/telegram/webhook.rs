//! Webhook receiver: Telegram POSTs updates to a small axum server.

use super::types::TgUpdate;
use super::{incoming_from_update, TelegramChannel};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use playwatch_core::{error::PlaywatchError, message::IncomingMessage};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub(crate) const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Shared state for the webhook handler.
#[derive(Clone)]
pub(crate) struct WebhookState {
    pub tx: mpsc::Sender<IncomingMessage>,
    /// Empty = not checked.
    pub secret: String,
    pub allowed_users: Vec<i64>,
}

pub(crate) fn webhook_router(path: &str, state: WebhookState) -> Router {
    Router::new()
        .route(path, post(handle_update))
        .with_state(state)
}

async fn handle_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    Json(update): Json<TgUpdate>,
) -> StatusCode {
    if !state.secret.is_empty() {
        let given = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if given != Some(state.secret.as_str()) {
            warn!("telegram webhook: rejected update with bad secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    if let Some(incoming) = incoming_from_update(update, &state.allowed_users) {
        if state.tx.send(incoming).await.is_err() {
            warn!("telegram webhook: receiver dropped");
            return StatusCode::SERVICE_UNAVAILABLE;
        }
    }

    // Telegram retries anything that is not 2xx, so ignored updates still get 200.
    StatusCode::OK
}

impl TelegramChannel {
    pub(super) async fn start_webhook(
        &self,
    ) -> Result<mpsc::Receiver<IncomingMessage>, PlaywatchError> {
        let hook = &self.config.webhook;
        let listener = tokio::net::TcpListener::bind(&hook.listen)
            .await
            .map_err(|e| {
                PlaywatchError::Channel(format!("failed to bind webhook on {}: {e}", hook.listen))
            })?;

        let (tx, rx) = mpsc::channel(64);
        let state = WebhookState {
            tx,
            secret: hook.secret_token.clone(),
            allowed_users: self.config.allowed_users.clone(),
        };
        let app = webhook_router(&hook.path, state);

        info!("Telegram webhook listening on {}{}", hook.listen, hook.path);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("telegram webhook server error: {e}");
            }
        });

        let public = format!(
            "{}{}",
            hook.public_url.trim_end_matches('/'),
            hook.path
        );
        self.set_webhook(&public, &hook.secret_token).await?;

        Ok(rx)
    }
}
