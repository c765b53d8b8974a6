//! Human-readable rendering of status transitions and current statuses.

use crate::error::PlaywatchError;
use crate::status::{HealthStatus, PersonaState, PresenceStatus};

/// Turns a status transition for one entity into a chat line.
pub trait Formatter<V>: Send + Sync {
    fn transition(&self, key: &str, old: &V, new: &V) -> Result<String, PlaywatchError>;
}

/// "alice started playing Rainbow Six Siege."
#[derive(Debug, Default, Clone, Copy)]
pub struct PresenceFormatter;

impl Formatter<PresenceStatus> for PresenceFormatter {
    fn transition(
        &self,
        key: &str,
        old: &PresenceStatus,
        new: &PresenceStatus,
    ) -> Result<String, PlaywatchError> {
        let line = match (old.is_active, new.is_active) {
            (false, true) => match new.activity_label.as_deref() {
                Some(label) => format!("{key} started playing {label}."),
                None => format!("{key} started playing."),
            },
            (true, false) => match old.activity_label.as_deref() {
                Some(label) => format!("{key} stopped playing {label}."),
                None => format!("{key} stopped playing."),
            },
            (true, true) => format!(
                "{key} switched from {} to {}.",
                old.activity_label.as_deref().unwrap_or("a game"),
                new.activity_label.as_deref().unwrap_or("another game"),
            ),
            (false, false) => {
                return Err(PlaywatchError::Format(format!(
                    "no presence transition for {key}: inactive on both sides"
                )))
            }
        };
        Ok(line)
    }
}

/// "Server status for Rainbow Six Siege changed from online to interrupted."
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthFormatter;

impl Formatter<HealthStatus> for HealthFormatter {
    fn transition(
        &self,
        key: &str,
        old: &HealthStatus,
        new: &HealthStatus,
    ) -> Result<String, PlaywatchError> {
        if old.as_str().is_empty() || new.as_str().is_empty() {
            return Err(PlaywatchError::Format(format!(
                "empty server status label for {key}"
            )));
        }
        Ok(format!(
            "Server status for {key} changed from {old} to {new}."
        ))
    }
}

/// One `/status` line for a player.
pub fn player_status_line(name: &str, state: PersonaState, game: Option<&str>) -> String {
    match game {
        Some(game) => format!("{name}: status \"{}\" and playing \"{game}\"", state.label()),
        None => format!("{name}: status \"{}\"", state.label()),
    }
}

/// One `/servers` line for a game.
pub fn server_status_line(game: &str, status: &HealthStatus) -> String {
    format!("{game}: {status}")
}
