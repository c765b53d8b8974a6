//! Notification sink that posts to a fixed chat through a channel.

use async_trait::async_trait;
use playwatch_core::{
    error::PlaywatchError,
    message::OutgoingMessage,
    traits::{Channel, NotificationSink},
};
use std::sync::Arc;

pub struct ChannelSink {
    channel: Arc<dyn Channel>,
    target: String,
}

impl ChannelSink {
    pub fn new(channel: Arc<dyn Channel>, target: String) -> Self {
        Self { channel, target }
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn deliver(&self, text: &str) -> Result<(), PlaywatchError> {
        self.channel
            .send(OutgoingMessage::text(self.target.clone(), text))
            .await
    }
}
