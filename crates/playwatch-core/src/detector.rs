//! Change detection against a last-observed baseline.

use crate::error::PlaywatchError;
use crate::format::Formatter;
use crate::status::{EntityKey, Snapshot};
use std::collections::HashMap;

/// Result of applying one snapshot to a detector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Change {
    pub changed: bool,
    /// Newline-joined transition lines, empty when nothing changed.
    pub message: String,
}

impl Change {
    pub fn none() -> Self {
        Self::default()
    }

    fn from_lines(lines: Vec<String>) -> Self {
        Self {
            changed: !lines.is_empty(),
            message: lines.join("\n"),
        }
    }
}

/// Holds the last observed status per entity and reports what changed.
///
/// - A key seen for the first time seeds the baseline and emits nothing.
/// - A known key with a different value emits one line and updates the baseline.
/// - Keys missing from a snapshot keep their last value.
///
/// Applying is all-or-nothing: if any line fails to format, the baseline
/// is left as it was.
#[derive(Debug, Clone)]
pub struct ChangeDetector<V> {
    baseline: HashMap<EntityKey, V>,
}

impl<V> Default for ChangeDetector<V> {
    fn default() -> Self {
        Self {
            baseline: HashMap::new(),
        }
    }
}

impl<V: Clone + PartialEq> ChangeDetector<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> &HashMap<EntityKey, V> {
        &self.baseline
    }

    pub fn last_seen(&self, key: &str) -> Option<&V> {
        self.baseline.get(key)
    }

    pub fn apply<F>(&mut self, snapshot: &Snapshot<V>, formatter: &F) -> Result<Change, PlaywatchError>
    where
        F: Formatter<V> + ?Sized,
    {
        let mut lines = Vec::new();
        let mut updates = Vec::new();

        for (key, new) in snapshot.iter() {
            match self.baseline.get(key) {
                None => updates.push((key, new)),
                Some(old) if old != new => {
                    lines.push(formatter.transition(key, old, new)?);
                    updates.push((key, new));
                }
                Some(_) => {}
            }
        }

        for (key, value) in updates {
            self.baseline.insert(key.to_string(), value.clone());
        }

        Ok(Change::from_lines(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{HealthFormatter, PresenceFormatter};
    use crate::status::{HealthStatus, PresenceStatus};

    fn presence(entries: &[(&str, PresenceStatus)]) -> Snapshot<PresenceStatus> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_first_apply_only_seeds() {
        let mut det = ChangeDetector::new();
        let snap = presence(&[
            ("alice", PresenceStatus::playing("Rainbow Six Siege")),
            ("bob", PresenceStatus::idle()),
        ]);
        let change = det.apply(&snap, &PresenceFormatter).unwrap();
        assert_eq!(change, Change::none());
        assert_eq!(det.baseline().len(), 2);
    }

    #[test]
    fn test_same_snapshot_twice_is_unchanged() {
        let mut det = ChangeDetector::new();
        let seed = presence(&[("alice", PresenceStatus::idle())]);
        det.apply(&seed, &PresenceFormatter).unwrap();

        let snap = presence(&[("alice", PresenceStatus::playing("Rainbow Six Siege"))]);
        assert!(det.apply(&snap, &PresenceFormatter).unwrap().changed);
        assert!(!det.apply(&snap, &PresenceFormatter).unwrap().changed);
    }

    #[test]
    fn test_start_playing_message() {
        let mut det = ChangeDetector::new();
        det.apply(&presence(&[("alice", PresenceStatus::idle())]), &PresenceFormatter)
            .unwrap();
        let change = det
            .apply(
                &presence(&[("alice", PresenceStatus::playing("Rainbow Six Siege"))]),
                &PresenceFormatter,
            )
            .unwrap();
        assert!(change.changed);
        assert_eq!(change.message, "alice started playing Rainbow Six Siege.");
    }

    #[test]
    fn test_new_key_after_seed_is_silent() {
        let mut det = ChangeDetector::new();
        det.apply(&presence(&[("alice", PresenceStatus::idle())]), &PresenceFormatter)
            .unwrap();
        let change = det
            .apply(
                &presence(&[
                    ("alice", PresenceStatus::idle()),
                    ("bob", PresenceStatus::playing("Rainbow Six Siege")),
                ]),
                &PresenceFormatter,
            )
            .unwrap();
        assert!(!change.changed);
        assert_eq!(
            det.last_seen("bob"),
            Some(&PresenceStatus::playing("Rainbow Six Siege"))
        );
    }

    #[test]
    fn test_missing_key_is_retained() {
        let mut det = ChangeDetector::new();
        det.apply(
            &presence(&[
                ("alice", PresenceStatus::playing("Rainbow Six Siege")),
                ("bob", PresenceStatus::idle()),
            ]),
            &PresenceFormatter,
        )
        .unwrap();

        let change = det
            .apply(&presence(&[("bob", PresenceStatus::idle())]), &PresenceFormatter)
            .unwrap();
        assert!(!change.changed);
        assert_eq!(
            det.last_seen("alice"),
            Some(&PresenceStatus::playing("Rainbow Six Siege"))
        );
    }

    #[test]
    fn test_lines_follow_snapshot_order() {
        let mut det = ChangeDetector::new();
        det.apply(
            &presence(&[("zed", PresenceStatus::idle()), ("amy", PresenceStatus::idle())]),
            &PresenceFormatter,
        )
        .unwrap();
        let change = det
            .apply(
                &presence(&[
                    ("zed", PresenceStatus::playing("R6")),
                    ("amy", PresenceStatus::playing("R6")),
                ]),
                &PresenceFormatter,
            )
            .unwrap();
        assert_eq!(
            change.message,
            "zed started playing R6.\namy started playing R6."
        );
    }

    #[test]
    fn test_health_transition() {
        let mut det = ChangeDetector::new();
        let online: Snapshot<HealthStatus> =
            [("Rainbow Six Siege", HealthStatus::new("online"))].into_iter().collect();
        let down: Snapshot<HealthStatus> =
            [("Rainbow Six Siege", HealthStatus::new("interrupted"))].into_iter().collect();
        det.apply(&online, &HealthFormatter).unwrap();
        let change = det.apply(&down, &HealthFormatter).unwrap();
        assert!(change.changed);
        assert!(change.message.contains("Rainbow Six Siege"));
        assert!(change.message.contains("interrupted"));
    }

    #[test]
    fn test_format_error_leaves_baseline_untouched() {
        let mut det = ChangeDetector::new();
        let seed: Snapshot<HealthStatus> = [
            ("A", HealthStatus::new("online")),
            ("B", HealthStatus::new("online")),
        ]
        .into_iter()
        .collect();
        det.apply(&seed, &HealthFormatter).unwrap();

        let bad: Snapshot<HealthStatus> = [
            ("A", HealthStatus::new("degraded")),
            ("B", HealthStatus::new("")),
        ]
        .into_iter()
        .collect();
        assert!(det.apply(&bad, &HealthFormatter).is_err());
        assert_eq!(det.last_seen("A"), Some(&HealthStatus::new("online")));
        assert_eq!(det.last_seen("B"), Some(&HealthStatus::new("online")));
    }
}
