//! Gateway: wires the chat channel, the command router, and the watch scheduler.
//!
//! Includes: command dispatch, change notifications, and graceful shutdown.

mod sink;


pub use sink::ChannelSink;

use crate::commands::CommandRouter;
use playwatch_core::{
    message::{IncomingMessage, OutgoingMessage},
    scheduler::Scheduler,
    traits::{Channel, NotificationSink},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// The central gateway between the chat channel and the status engine.
pub struct Gateway {
    channel: Arc<dyn Channel>,
    router: CommandRouter,
    /// Chat that receives change notifications.
    notify_target: String,
    tick_interval: Duration,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channel: Arc<dyn Channel>,
        router: CommandRouter,
        notify_target: String,
        tick_interval: Duration,
    ) -> Self {
        Self {
            channel,
            router,
            notify_target,
            tick_interval,
        }
    }

    /// Run until Ctrl-C: serve commands and run the scheduler in the background.
    pub async fn run(self: Arc<Self>, scheduler: Scheduler) -> anyhow::Result<()> {
        info!(
            "Playwatch gateway running | channel: {} | watches: {} | tick: {}s",
            self.channel.name(),
            scheduler.len(),
            self.tick_interval.as_secs(),
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;
        self.channel.register_commands(&self.router.menu()).await;
        info!("Channel started: {}", self.channel.name());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sink: Arc<dyn NotificationSink> = Arc::new(ChannelSink::new(
            self.channel.clone(),
            self.notify_target.clone(),
        ));
        let tick = self.tick_interval;
        let sched_handle = tokio::spawn(async move {
            scheduler.run(tick, sink, shutdown_rx).await;
        });

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                incoming = rx.recv() => {
                    let Some(incoming) = incoming else {
                        warn!("channel closed its message stream");
                        break;
                    };
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.handle_message(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        // Graceful shutdown: let the current tick finish, then stop the channel.
        let _ = shutdown_tx.send(true);
        if let Err(e) = sched_handle.await {
            error!("scheduler task failed: {e}");
        }
        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel: {e}");
        }
        info!("Shutdown complete.");
        Ok(())
    }

    /// Answer one incoming message if it is a known command.
    pub(crate) async fn handle_message(&self, incoming: IncomingMessage) {
        let Some(reply) = self.router.dispatch(&incoming.text).await else {
            return;
        };

        info!(
            "[{}] {} ran {}",
            incoming.channel,
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            incoming.text.split_whitespace().next().unwrap_or_default()
        );

        let Some(target) = incoming.reply_target else {
            warn!("no reply target for command from {}", incoming.sender_id);
            return;
        };
        if let Err(e) = self.channel.send(OutgoingMessage::text(target, reply)).await {
            error!("failed to send command reply: {e}");
        }
    }
}
