//! Status command handlers: /status, /servers, /tell_off, /help.

use super::{CommandContext, CommandHandler};
use async_trait::async_trait;
use playwatch_core::{
    error::PlaywatchError,
    format::{player_status_line, server_status_line},
    status::HealthStatus,
    traits::StatusSource,
};
use playwatch_sources::steam::{PlayerSummary, SteamPresenceSource};
use std::sync::Arc;
use tracing::warn;

/// Fresh per-player summaries, for `/status`.
#[async_trait]
pub trait PlayerLookup: Send + Sync {
    async fn summaries(&self) -> Result<Vec<PlayerSummary>, PlaywatchError>;
}

#[async_trait]
impl PlayerLookup for SteamPresenceSource {
    async fn summaries(&self) -> Result<Vec<PlayerSummary>, PlaywatchError> {
        SteamPresenceSource::summaries(self).await
    }
}

/// `/status`: what every tracked player is doing.
pub struct PlayersCommand {
    lookup: Arc<dyn PlayerLookup>,
}

impl PlayersCommand {
    pub fn new(lookup: Arc<dyn PlayerLookup>) -> Self {
        Self { lookup }
    }

    /// Status lines for all players, or only for `filter` (case-insensitive) when non-empty.
    pub async fn report(&self, filter: &str) -> String {
        match self.lookup.summaries().await {
            Ok(summaries) if summaries.is_empty() => "No players are tracked.".to_string(),
            Ok(summaries) => {
                let selected: Vec<&PlayerSummary> = summaries
                    .iter()
                    .filter(|s| filter.is_empty() || s.name.eq_ignore_ascii_case(filter))
                    .collect();
                if selected.is_empty() {
                    return format!("{filter} is not a tracked player.");
                }
                selected
                    .into_iter()
                    .map(|s| {
                        let game = s.game_name.as_deref().or(s.game_id.as_deref());
                        player_status_line(&s.name, s.persona_state, game)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Err(e) => {
                warn!("/status: {e}");
                format!("Could not fetch player status: {e}")
            }
        }
    }
}

#[async_trait]
impl CommandHandler for PlayersCommand {
    fn description(&self) -> &str {
        "What every tracked player is doing (or one: /status <name>)"
    }

    async fn handle(&self, ctx: &CommandContext<'_>) -> String {
        self.report(ctx.args).await
    }
}

/// `/servers`: current server status of every tracked game.
pub struct ServersCommand {
    source: Arc<dyn StatusSource<Status = HealthStatus>>,
}

impl ServersCommand {
    pub fn new(source: Arc<dyn StatusSource<Status = HealthStatus>>) -> Self {
        Self { source }
    }

    pub async fn report(&self) -> String {
        match self.source.fetch().await {
            Ok(snapshot) if snapshot.is_empty() => "No game servers are tracked.".to_string(),
            Ok(snapshot) => snapshot
                .iter()
                .map(|(game, status)| server_status_line(game, status))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                warn!("/servers: {e}");
                format!("Could not fetch server status: {e}")
            }
        }
    }
}

#[async_trait]
impl CommandHandler for ServersCommand {
    fn description(&self) -> &str {
        "Server status of every tracked game"
    }

    async fn handle(&self, _ctx: &CommandContext<'_>) -> String {
        self.report().await
    }
}

/// `/tell_off`: for the spammers.
pub struct TellOffCommand;

#[async_trait]
impl CommandHandler for TellOffCommand {
    fn description(&self) -> &str {
        "Ask the spammers to stop"
    }

    async fn handle(&self, _ctx: &CommandContext<'_>) -> String {
        "Leave me in peace, spammers.".to_string()
    }
}

/// `/help`: lists the command menu it was built with.
pub struct HelpCommand {
    menu: Vec<(String, String)>,
}

impl HelpCommand {
    pub const DESCRIPTION: &'static str = "Show available commands";

    pub fn new(menu: Vec<(String, String)>) -> Self {
        Self { menu }
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    async fn handle(&self, _ctx: &CommandContext<'_>) -> String {
        let mut out = String::from("Commands:");
        for (name, description) in &self.menu {
            out.push_str(&format!("\n/{name} - {description}"));
        }
        out
    }
}
