use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::defaults::*;

/// Steam Web API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamConfig {
    /// Falls back to the `STEAM_API_KEY` env var when empty.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_steam_base_url")]
    pub base_url: String,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_steam_base_url(),
        }
    }
}

/// Ubisoft game status API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UbisoftConfig {
    #[serde(default = "default_ubisoft_base_url")]
    pub base_url: String,
}

impl Default for UbisoftConfig {
    fn default() -> Self {
        Self {
            base_url: default_ubisoft_base_url(),
        }
    }
}

/// Polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Scheduler tick.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// Server health is re-queried at most this often.
    #[serde(default = "default_health_min_interval")]
    pub health_poll_min_interval_secs: u64,
    /// Player presence is re-queried at most this often (0 = every tick).
    #[serde(default)]
    pub presence_poll_min_interval_secs: u64,
    /// Per-request HTTP timeout for status lookups.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
            health_poll_min_interval_secs: default_health_min_interval(),
            presence_poll_min_interval_secs: 0,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// A tracked game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Steam app id; a player whose `gameid` matches counts as playing this game.
    pub presence_id: String,
    /// Ubisoft app id for server health. Absent = no server tracking.
    #[serde(default)]
    pub health_id: Option<String>,
}

/// Tracked games, built once at startup.
///
/// Resolves Steam app ids to game names and lists the games that have a
/// server health endpoint, both in game-name order.
#[derive(Debug, Clone, Default)]
pub struct GameTable {
    by_presence_id: HashMap<String, String>,
    health: Vec<(String, String)>,
}

impl GameTable {
    pub fn new(games: &BTreeMap<String, GameConfig>) -> Self {
        let mut by_presence_id = HashMap::new();
        let mut health = Vec::new();
        for (name, game) in games {
            by_presence_id.insert(game.presence_id.trim().to_string(), name.clone());
            if let Some(id) = game.health_id.as_deref().map(str::trim) {
                if !id.is_empty() {
                    health.push((name.clone(), id.to_string()));
                }
            }
        }
        Self {
            by_presence_id,
            health,
        }
    }

    /// Name of the tracked game with this Steam app id.
    pub fn game_for(&self, presence_id: &str) -> Option<&str> {
        self.by_presence_id.get(presence_id).map(String::as_str)
    }

    /// `(game name, health id)` for every game with a health endpoint.
    pub fn health_targets(&self) -> &[(String, String)] {
        &self.health
    }

    pub fn len(&self) -> usize {
        self.by_presence_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_presence_id.is_empty()
    }
}
