//! # playwatch-sources
//!
//! HTTP status sources for Playwatch: Steam player presence and Ubisoft
//! server health.

pub mod steam;
pub mod ubisoft;

#[cfg(test)]
pub(crate) mod test_server;

use playwatch_core::error::PlaywatchError;
use tracing::warn;

/// Keep the lookups that succeeded, logging the rest.
///
/// Fails only when lookups were attempted and every one of them failed.
pub(crate) fn collect_lookups<T>(
    source: &str,
    results: Vec<(String, Result<T, PlaywatchError>)>,
) -> Result<Vec<(String, T)>, PlaywatchError> {
    let attempted = results.len();
    let mut ok = Vec::with_capacity(attempted);
    let mut last_err = None;

    for (key, result) in results {
        match result {
            Ok(value) => ok.push((key, value)),
            Err(e) => {
                warn!("{source}: lookup for {key} failed: {e}");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) if ok.is_empty() => Err(PlaywatchError::Fetch(format!(
            "{source}: all {attempted} lookups failed, last error: {e}"
        ))),
        _ => Ok(ok),
    }
}
