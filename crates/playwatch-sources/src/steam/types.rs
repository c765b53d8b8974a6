//! Steam Web API deserialization types.

use serde::Deserialize;

/// `ISteamUser/GetPlayerSummaries/v2` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct SummariesResponse {
    pub response: SummariesBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummariesBody {
    #[serde(default)]
    pub players: Vec<SteamPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SteamPlayer {
    pub steamid: String,
    #[serde(default)]
    pub personastate: i64,
    /// Present only while the player is in a game.
    #[serde(default)]
    pub gameid: Option<String>,
    #[serde(default)]
    pub gameextrainfo: Option<String>,
}
