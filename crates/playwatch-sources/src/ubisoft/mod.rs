//! Ubisoft server health.
//!
//! `GET {base}/instances?appIds={id}` returns an array of platform
//! instances; the first element's `Status` is the game's status.

pub(crate) mod types;


use crate::collect_lookups;
use async_trait::async_trait;
use playwatch_core::{
    config::{GameTable, UbisoftConfig},
    error::PlaywatchError,
    status::{HealthStatus, Snapshot},
    traits::StatusSource,
};
use std::time::Duration;
use tracing::debug;
use types::GameInstance;

/// Server health source backed by the Ubisoft game status API.
pub struct UbisoftHealthSource {
    client: reqwest::Client,
    base_url: String,
    /// (game name, Ubisoft app id); games without one are not tracked here.
    targets: Vec<(String, String)>,
    timeout: Duration,
}

impl UbisoftHealthSource {
    /// Create from config values.
    pub fn from_config(config: &UbisoftConfig, games: &GameTable, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            targets: games.health_targets().to_vec(),
            timeout,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    async fn lookup(&self, app_id: &str) -> Result<HealthStatus, PlaywatchError> {
        let url = format!("{}/instances", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("appIds", app_id)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PlaywatchError::Fetch(format!("ubisoft request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PlaywatchError::Fetch(format!(
                "ubisoft returned {status} for {app_id}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PlaywatchError::Fetch(format!("ubisoft read failed: {e}")))?;
        parse_status(&body)
    }
}

/// Status of the first instance in an `instances` body.
pub(crate) fn parse_status(body: &str) -> Result<HealthStatus, PlaywatchError> {
    let instances: Vec<GameInstance> = serde_json::from_str(body)
        .map_err(|e| PlaywatchError::Fetch(format!("ubisoft parse failed: {e}")))?;
    let first = instances
        .into_iter()
        .next()
        .ok_or_else(|| PlaywatchError::Fetch("ubisoft returned no instances".into()))?;

    if let Some(features) = first.impacted_features.as_ref().filter(|f| !f.is_empty()) {
        debug!(
            "ubisoft: {} impacted features: {}",
            first.name.as_deref().unwrap_or("instance"),
            features.join(", ")
        );
    }

    let status = HealthStatus::new(&first.status);
    if status.as_str().is_empty() {
        return Err(PlaywatchError::Fetch("ubisoft returned an empty Status".into()));
    }
    Ok(status)
}

#[async_trait]
impl StatusSource for UbisoftHealthSource {
    type Status = HealthStatus;

    fn name(&self) -> &str {
        "ubisoft"
    }

    async fn fetch(&self) -> Result<Snapshot<HealthStatus>, PlaywatchError> {
        let mut results = Vec::with_capacity(self.targets.len());
        for (game, app_id) in &self.targets {
            results.push((game.clone(), self.lookup(app_id).await));
        }
        Ok(collect_lookups("ubisoft", results)?.into_iter().collect())
    }
}
