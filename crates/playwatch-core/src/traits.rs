use crate::{
    error::PlaywatchError,
    message::{IncomingMessage, OutgoingMessage},
    status::Snapshot,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Status source trait. The eyes.
///
/// Every upstream status API (player presence, server health) implements
/// this trait. A fetch either yields a complete snapshot or fails with
/// [`PlaywatchError::Fetch`]; "offline" is a status value, not an error.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Status value produced per entity.
    type Status: Clone + PartialEq + Send + Sync;

    /// Human-readable source name, used in logs.
    fn name(&self) -> &str;

    /// Fetch the current status of every tracked entity.
    async fn fetch(&self) -> Result<Snapshot<Self::Status>, PlaywatchError>;
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for Arc<S> {
    type Status = S::Status;

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self) -> Result<Snapshot<Self::Status>, PlaywatchError> {
        (**self).fetch().await
    }
}

/// Where aggregated change messages go.
///
/// Delivery is best-effort: the scheduler logs a failed delivery and moves on.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), PlaywatchError>;
}

/// Messaging Channel trait. The voice.
///
/// Every messaging platform implements this trait to receive commands and
/// send messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, PlaywatchError>;

    /// Send a message through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), PlaywatchError>;

    /// Publish the command menu (name, description) to the platform, if it has one.
    async fn register_commands(&self, _commands: &[(String, String)]) {}

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), PlaywatchError>;
}
