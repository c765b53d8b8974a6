//! Tests for the Steam presence source.

use super::*;
use playwatch_core::config::GameConfig;

const IN_GAME: &str = r#"{
    "response": {
        "players": [{
            "steamid": "76561190000000001",
            "personaname": "alice_r6",
            "personastate": 1,
            "gameid": "359550",
            "gameextrainfo": "Tom Clancy's Rainbow Six Siege"
        }]
    }
}"#;

fn games() -> GameTable {
    let mut games = BTreeMap::new();
    games.insert(
        "Rainbow Six Siege".to_string(),
        GameConfig {
            presence_id: "359550".to_string(),
            health_id: None,
        },
    );
    GameTable::new(&games)
}

fn summary(game_id: Option<&str>) -> PlayerSummary {
    PlayerSummary {
        name: "alice".to_string(),
        persona_state: PersonaState::Online,
        game_id: game_id.map(str::to_string),
        game_name: game_id.map(|_| "Some Game".to_string()),
    }
}

#[test]
fn test_parse_summary_in_game() {
    let player = parse_summary(IN_GAME, "76561190000000001")
        .unwrap()
        .unwrap();
    assert_eq!(player.personastate, 1);
    assert_eq!(player.gameid.as_deref(), Some("359550"));

    let summary = PlayerSummary::from_player("alice", Some(player));
    assert_eq!(summary.persona_state, PersonaState::Online);
    assert_eq!(
        summary.game_name.as_deref(),
        Some("Tom Clancy's Rainbow Six Siege")
    );
}

#[test]
fn test_parse_summary_without_game_fields() {
    let body = r#"{"response": {"players": [{"steamid": "1", "personastate": 3}]}}"#;
    let player = parse_summary(body, "1").unwrap().unwrap();
    let summary = PlayerSummary::from_player("bob", Some(player));
    assert_eq!(summary.persona_state, PersonaState::Away);
    assert!(summary.game_id.is_none());
    assert_eq!(presence_for(&games(), &summary), PresenceStatus::idle());
}

#[test]
fn test_parse_summary_empty_players_is_not_an_error() {
    let body = r#"{"response": {"players": []}}"#;
    assert!(parse_summary(body, "1").unwrap().is_none());

    let summary = PlayerSummary::from_player("carol", None);
    assert_eq!(summary.persona_state, PersonaState::Offline);
    assert_eq!(presence_for(&games(), &summary), PresenceStatus::idle());
}

#[test]
fn test_parse_summary_malformed_is_fetch_error() {
    let err = parse_summary("<html>502</html>", "1").unwrap_err();
    assert!(matches!(err, PlaywatchError::Fetch(_)));
}

#[test]
fn test_tracked_game_uses_configured_name() {
    assert_eq!(
        presence_for(&games(), &summary(Some("359550"))),
        PresenceStatus::playing("Rainbow Six Siege")
    );
}

#[test]
fn test_untracked_game_is_inactive() {
    let presence = presence_for(&games(), &summary(Some("730")));
    assert!(!presence.is_active);
    assert!(presence.activity_label.is_none());
}

#[test]
fn test_empty_game_id_is_ignored() {
    let body = r#"{"response": {"players": [{"steamid": "1", "personastate": 1, "gameid": ""}]}}"#;
    let player = parse_summary(body, "1").unwrap();
    let summary = PlayerSummary::from_player("dave", player);
    assert!(summary.game_id.is_none());
}

#[test]
fn test_source_keeps_player_order() {
    let mut players = BTreeMap::new();
    players.insert("zed".to_string(), " 2 ".to_string());
    players.insert("amy".to_string(), "1".to_string());
    let source = SteamPresenceSource::from_config(
        &SteamConfig::default(),
        &players,
        games(),
        Duration::from_secs(5),
    );
    let names: Vec<&str> = source.players.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["amy", "zed"]);
    assert_eq!(source.players[1].1, "2");
    assert_eq!(source.name(), "steam");
}

mod http {
    use super::*;
    use crate::test_server::serve;
    use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use std::collections::HashMap;

    /// Steam id "1" is in Siege, "3" is online outside any game; anything else is a 500.
    async fn summaries(Query(q): Query<HashMap<String, String>>) -> axum::response::Response {
        if q.get("key").map(String::as_str) != Some("STEAMKEY") {
            return StatusCode::FORBIDDEN.into_response();
        }
        match q.get("steamids").map(String::as_str) {
            Some("1") => Json(serde_json::json!({
                "response": {"players": [{
                    "steamid": "1",
                    "personastate": 1,
                    "gameid": "359550",
                    "gameextrainfo": "Tom Clancy's Rainbow Six Siege"
                }]}
            }))
            .into_response(),
            Some("3") => Json(serde_json::json!({
                "response": {"players": [{"steamid": "3", "personastate": 1}]}
            }))
            .into_response(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }

    async fn source(players: &[(&str, &str)]) -> SteamPresenceSource {
        let app = Router::new().route("/ISteamUser/GetPlayerSummaries/v0002/", get(summaries));
        let config = SteamConfig {
            api_key: "STEAMKEY".into(),
            base_url: format!("{}/", serve(app).await),
        };
        let players = players
            .iter()
            .map(|(name, id)| (name.to_string(), id.to_string()))
            .collect();
        SteamPresenceSource::from_config(&config, &players, games(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_fetch_omits_failed_player() {
        let source = source(&[("alice", "1"), ("bob", "2"), ("carol", "3")]).await;
        let snap = source.fetch().await.unwrap();

        let keys: Vec<&str> = snap.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alice", "carol"]);
        assert_eq!(
            snap.get("alice"),
            Some(&PresenceStatus::playing("Rainbow Six Siege"))
        );
        assert_eq!(snap.get("carol"), Some(&PresenceStatus::idle()));
        assert!(snap.get("bob").is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_players_failing_is_fetch_error() {
        let source = source(&[("bob", "2"), ("dave", "4")]).await;
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, PlaywatchError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_summaries_report_game_name() {
        let source = source(&[("alice", "1")]).await;
        let summaries = source.summaries().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].game_id.as_deref(), Some("359550"));
        assert_eq!(
            summaries[0].game_name.as_deref(),
            Some("Tom Clancy's Rainbow Six Siege")
        );
    }
}
