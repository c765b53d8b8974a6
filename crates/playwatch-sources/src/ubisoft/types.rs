//! Ubisoft game status API deserialization types.

use serde::Deserialize;

/// One element of the `instances?appIds=...` array.
#[derive(Debug, Deserialize)]
pub(crate) struct GameInstance {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "ImpactedFeatures", default)]
    pub impacted_features: Option<Vec<String>>,
}
