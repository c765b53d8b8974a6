use super::*;
use playwatch_core::{
    error::PlaywatchError,
    status::{HealthStatus, PersonaState, Snapshot},
    traits::StatusSource,
};
use playwatch_sources::steam::PlayerSummary;

struct FakePlayers(Result<Vec<PlayerSummary>, String>);

#[async_trait]
impl PlayerLookup for FakePlayers {
    async fn summaries(&self) -> Result<Vec<PlayerSummary>, PlaywatchError> {
        self.0.clone().map_err(PlaywatchError::Fetch)
    }
}

struct FakeServers(Vec<(&'static str, &'static str)>);

#[async_trait]
impl StatusSource for FakeServers {
    type Status = HealthStatus;

    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self) -> Result<Snapshot<HealthStatus>, PlaywatchError> {
        Ok(self
            .0
            .iter()
            .map(|(game, status)| (*game, HealthStatus::new(status)))
            .collect())
    }
}

fn alice_and_bob() -> Vec<PlayerSummary> {
    vec![
        PlayerSummary {
            name: "alice".into(),
            persona_state: PersonaState::Online,
            game_id: Some("359550".into()),
            game_name: Some("Tom Clancy's Rainbow Six Siege".into()),
        },
        PlayerSummary {
            name: "bob".into(),
            persona_state: PersonaState::Away,
            game_id: None,
            game_name: None,
        },
    ]
}

fn router() -> CommandRouter {
    build_router(
        Some(Arc::new(FakePlayers(Ok(alice_and_bob())))),
        Some(ServersCommand::new(Arc::new(FakeServers(vec![(
            "Rainbow Six Siege",
            "Online",
        )])))),
    )
}

#[test]
fn test_parse_commands() {
    assert_eq!(CommandRouter::parse("/status"), Some(("status", "")));
    assert_eq!(
        CommandRouter::parse("/status@playwatch_bot"),
        Some(("status", ""))
    );
    assert_eq!(
        CommandRouter::parse("  /servers  now please "),
        Some(("servers", "now please"))
    );
    assert_eq!(CommandRouter::parse("status"), None);
    assert_eq!(CommandRouter::parse("/"), None);
    assert_eq!(CommandRouter::parse("hello there"), None);
}

#[tokio::test]
async fn test_status_lists_players() {
    let reply = router().dispatch("/status").await.unwrap();
    assert_eq!(
        reply,
        "alice: status \"Online\" and playing \"Tom Clancy's Rainbow Six Siege\"\n\
         bob: status \"Away\""
    );
}

#[tokio::test]
async fn test_status_filters_by_name() {
    let reply = router().dispatch("/status Bob").await.unwrap();
    assert_eq!(reply, "bob: status \"Away\"");

    let reply = router().dispatch("/status nobody").await.unwrap();
    assert_eq!(reply, "nobody is not a tracked player.");
}

#[tokio::test]
async fn test_status_reports_fetch_failure() {
    let router = build_router(Some(Arc::new(FakePlayers(Err("timeout".into())))), None);
    let reply = router.dispatch("/status").await.unwrap();
    assert!(reply.starts_with("Could not fetch player status"));
    assert!(reply.contains("timeout"));
}

#[tokio::test]
async fn test_servers_lists_games() {
    let reply = router().dispatch("/servers@playwatch_bot").await.unwrap();
    assert_eq!(reply, "Rainbow Six Siege: online");
}

#[tokio::test]
async fn test_tell_off() {
    let reply = router().dispatch("/tell_off").await.unwrap();
    assert_eq!(reply, "Leave me in peace, spammers.");
}

#[tokio::test]
async fn test_unknown_command_and_plain_text_ignored() {
    let router = router();
    assert!(router.dispatch("/unknown").await.is_none());
    assert!(router.dispatch("gg everyone").await.is_none());
}

#[tokio::test]
async fn test_help_lists_menu() {
    let router = router();
    let reply = router.dispatch("/help").await.unwrap();
    for (name, _) in router.menu() {
        assert!(reply.contains(&format!("/{name}")), "missing /{name} in {reply}");
    }
}

#[test]
fn test_menu_skips_untracked_sources() {
    let router = build_router(None, None);
    let names: Vec<String> = router.menu().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["tell_off", "help"]);
}

#[tokio::test]
async fn test_register_replaces_existing() {
    let mut router = router();
    router.register("/tell_off", Arc::new(HelpCommand::new(Vec::new())));
    let reply = router.dispatch("/tell_off").await.unwrap();
    assert_eq!(reply, "Commands:");
    assert_eq!(router.menu().len(), 4);
}
