mod channels;
mod defaults;
mod tracking;


pub use channels::*;
pub use tracking::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::error::PlaywatchError;
use defaults::*;

/// Top-level Playwatch configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub steam: SteamConfig,
    #[serde(default)]
    pub ubisoft: UbisoftConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    /// Player display name → Steam id.
    #[serde(default)]
    pub players: BTreeMap<String, String>,
    /// Game display name → ids.
    #[serde(default)]
    pub games: BTreeMap<String, GameConfig>,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Fill empty secrets from the environment (`TELEGRAM_BOT_TOKEN`, `STEAM_API_KEY`).
    pub fn apply_env(&mut self) {
        if self.telegram.bot_token.is_empty() {
            if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
                self.telegram.bot_token = token;
            }
        }
        if self.steam.api_key.is_empty() {
            if let Ok(key) = std::env::var("STEAM_API_KEY") {
                self.steam.api_key = key;
            }
        }
    }

    /// Check what the status sources need: something to track, credentials, sane timeouts.
    pub fn validate_sources(&self) -> Result<(), PlaywatchError> {
        if self.watch.request_timeout_secs == 0 {
            return Err(PlaywatchError::Config(
                "watch.request_timeout_secs must be greater than 0".into(),
            ));
        }
        if !self.players.is_empty() && self.steam.api_key.is_empty() {
            return Err(PlaywatchError::Config(
                "players are configured but steam.api_key is empty. \
                 Set it in config.toml or the STEAM_API_KEY env var."
                    .into(),
            ));
        }
        if let Some((name, _)) = self
            .games
            .iter()
            .find(|(_, g)| g.presence_id.trim().is_empty())
        {
            return Err(PlaywatchError::Config(format!(
                "game '{name}' has an empty presence_id"
            )));
        }
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for (name, game) in &self.games {
            if let Some(other) = seen.insert(game.presence_id.trim(), name) {
                return Err(PlaywatchError::Config(format!(
                    "games '{other}' and '{name}' share presence_id {}",
                    game.presence_id.trim()
                )));
            }
        }
        if self.players.is_empty() && self.game_table().health_targets().is_empty() {
            return Err(PlaywatchError::Config(
                "nothing to watch: configure [players] or a game with a health_id".into(),
            ));
        }
        Ok(())
    }

    /// Full check before running the bot.
    pub fn validate(&self) -> Result<(), PlaywatchError> {
        if self.telegram.bot_token.is_empty() {
            return Err(PlaywatchError::Config(
                "telegram.bot_token is empty. \
                 Set it in config.toml or the TELEGRAM_BOT_TOKEN env var."
                    .into(),
            ));
        }
        if self.telegram.chat_id.is_none() {
            return Err(PlaywatchError::Config(
                "telegram.chat_id is not set; notifications have nowhere to go".into(),
            ));
        }
        if self.telegram.mode == UpdateMode::Webhook && self.telegram.webhook.public_url.is_empty()
        {
            return Err(PlaywatchError::Config(
                "telegram.mode is \"webhook\" but telegram.webhook.public_url is empty".into(),
            ));
        }
        if self.telegram.mode == UpdateMode::Webhook && !self.telegram.webhook.path.starts_with('/')
        {
            return Err(PlaywatchError::Config(format!(
                "telegram.webhook.path must start with '/', got \"{}\"",
                self.telegram.webhook.path
            )));
        }
        if self.watch.tick_interval_secs == 0 {
            return Err(PlaywatchError::Config(
                "watch.tick_interval_secs must be greater than 0".into(),
            ));
        }
        self.validate_sources()
    }

    pub fn game_table(&self) -> GameTable {
        GameTable::new(&self.games)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.watch.tick_interval_secs)
    }

    pub fn health_min_interval(&self) -> Duration {
        Duration::from_secs(self.watch.health_poll_min_interval_secs)
    }

    pub fn presence_min_interval(&self) -> Duration {
        Duration::from_secs(self.watch.presence_poll_min_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.watch.request_timeout_secs)
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file and fill secrets from the environment.
///
/// A missing file is an error: there is nothing useful to watch without one.
pub fn load(path: &str) -> Result<Config, PlaywatchError> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(PlaywatchError::Config(format!(
            "config file not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PlaywatchError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let mut config = parse(&content)?;
    config.apply_env();
    tracing::info!("Config loaded from {}", path.display());
    Ok(config)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, PlaywatchError> {
    toml::from_str(content)
        .map_err(|e| PlaywatchError::Config(format!("failed to parse config: {}", e)))
}
