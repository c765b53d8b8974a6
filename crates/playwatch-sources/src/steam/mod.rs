//! Steam player presence.
//!
//! One `GetPlayerSummaries` request per tracked player.
//! Docs: <https://developer.valvesoftware.com/wiki/Steam_Web_API#GetPlayerSummaries_.28v0002.29>

pub(crate) mod types;

#[cfg(test)]
mod tests;

use crate::collect_lookups;
use async_trait::async_trait;
use playwatch_core::{
    config::{GameTable, SteamConfig},
    error::PlaywatchError,
    status::{PersonaState, PresenceStatus, Snapshot},
    traits::StatusSource,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use types::{SteamPlayer, SummariesResponse};

/// What Steam says about one tracked player right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    /// Configured display name.
    pub name: String,
    pub persona_state: PersonaState,
    /// Steam app id of the running game, any game.
    pub game_id: Option<String>,
    /// Steam's name for the running game.
    pub game_name: Option<String>,
}

impl PlayerSummary {
    fn from_player(name: &str, player: Option<SteamPlayer>) -> Self {
        match player {
            Some(p) => Self {
                name: name.to_string(),
                persona_state: PersonaState::from_code(p.personastate),
                game_id: p.gameid.filter(|id| !id.is_empty()),
                game_name: p.gameextrainfo,
            },
            None => Self {
                name: name.to_string(),
                persona_state: PersonaState::Offline,
                game_id: None,
                game_name: None,
            },
        }
    }
}

/// Map a summary onto presence: active only while in an allow-listed game.
pub fn presence_for(games: &GameTable, summary: &PlayerSummary) -> PresenceStatus {
    let tracked = summary
        .game_id
        .as_deref()
        .and_then(|id| games.game_for(id));
    match tracked {
        Some(game) if !game.is_empty() => PresenceStatus::playing(game),
        Some(_) => PresenceStatus {
            is_active: true,
            activity_label: summary.game_name.clone(),
        },
        None => PresenceStatus::idle(),
    }
}

/// Player presence source backed by the Steam Web API.
pub struct SteamPresenceSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// (display name, steam id), in name order.
    players: Vec<(String, String)>,
    games: GameTable,
    timeout: Duration,
}

impl SteamPresenceSource {
    /// Create from config values.
    pub fn from_config(
        config: &SteamConfig,
        players: &BTreeMap<String, String>,
        games: GameTable,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            players: players
                .iter()
                .map(|(name, id)| (name.clone(), id.trim().to_string()))
                .collect(),
            games,
            timeout,
        }
    }

    /// Look up every tracked player.
    ///
    /// Players whose lookup fails are left out; only a failure for every
    /// player is an error.
    pub async fn summaries(&self) -> Result<Vec<PlayerSummary>, PlaywatchError> {
        let mut results = Vec::with_capacity(self.players.len());
        for (name, steam_id) in &self.players {
            let result = self
                .lookup(steam_id)
                .await
                .map(|player| PlayerSummary::from_player(name, player));
            results.push((name.clone(), result));
        }

        Ok(collect_lookups("steam", results)?
            .into_iter()
            .map(|(_, summary)| summary)
            .collect())
    }

    /// Fetch one player's summary. `None` when Steam knows nothing about the id.
    async fn lookup(&self, steam_id: &str) -> Result<Option<SteamPlayer>, PlaywatchError> {
        let url = format!("{}/ISteamUser/GetPlayerSummaries/v0002/", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("steamids", steam_id)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PlaywatchError::Fetch(format!("steam request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PlaywatchError::Fetch(format!(
                "steam returned {status} for {steam_id}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PlaywatchError::Fetch(format!("steam read failed: {e}")))?;
        parse_summary(&body, steam_id)
    }
}

/// Pick the player for `steam_id` out of a `GetPlayerSummaries` body.
pub(crate) fn parse_summary(
    body: &str,
    steam_id: &str,
) -> Result<Option<SteamPlayer>, PlaywatchError> {
    let parsed: SummariesResponse = serde_json::from_str(body)
        .map_err(|e| PlaywatchError::Fetch(format!("steam parse failed: {e}")))?;
    let players = parsed.response.players;
    let player = players
        .iter()
        .find(|p| p.steamid == steam_id)
        .or_else(|| players.first())
        .cloned();
    if player.is_none() {
        debug!("steam: no summary for {steam_id}");
    }
    Ok(player)
}

#[async_trait]
impl StatusSource for SteamPresenceSource {
    type Status = PresenceStatus;

    fn name(&self) -> &str {
        "steam"
    }

    async fn fetch(&self) -> Result<Snapshot<PresenceStatus>, PlaywatchError> {
        let summaries = self.summaries().await?;
        Ok(summaries
            .iter()
            .map(|s| (s.name.clone(), presence_for(&self.games, s)))
            .collect())
    }
}
