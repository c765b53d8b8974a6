//! Status values and snapshots.

use serde::{Deserialize, Serialize};

/// Identifies a tracked entity (a player name or a game name) within one source.
pub type EntityKey = String;

/// The full set of statuses returned by one source fetch.
///
/// Keeps the order in which the source inserted entries; inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<V> {
    entries: Vec<(EntityKey, V)>,
}

impl<V> Default for Snapshot<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Snapshot<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<EntityKey>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<EntityKey>, V> FromIterator<(K, V)> for Snapshot<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (k, v) in iter {
            snapshot.insert(k, v);
        }
        snapshot
    }
}

/// Whether a player is in a tracked game right now.
///
/// Two presences are equal only when both `is_active` and `activity_label` match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresenceStatus {
    pub is_active: bool,
    pub activity_label: Option<String>,
}

impl PresenceStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn playing(label: impl Into<String>) -> Self {
        Self {
            is_active: true,
            activity_label: Some(label.into()),
        }
    }
}

/// Server health label as reported upstream ("online", "interrupted", "degraded", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus(pub String);

impl HealthStatus {
    /// Normalize a raw upstream label: trimmed and lowercased.
    pub fn new(label: &str) -> Self {
        Self(label.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Steam persona state (`personastate` in player summaries).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PersonaState {
    #[default]
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
    LookingToTrade,
    LookingToPlay,
    Unknown,
}

impl PersonaState {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Offline,
            1 => Self::Online,
            2 => Self::Busy,
            3 => Self::Away,
            4 => Self::Snooze,
            5 => Self::LookingToTrade,
            6 => Self::LookingToPlay,
            _ => Self::Unknown,
        }
    }

    /// Human-readable name for display (e.g. in `/status`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Offline => "Offline",
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Away => "Away",
            Self::Snooze => "Snooze",
            Self::LookingToTrade => "Looking to trade",
            Self::LookingToPlay => "Looking to play",
            Self::Unknown => "unknown",
        }
    }
}
