//! Minimum re-query interval around a status source.

use crate::error::PlaywatchError;
use crate::status::Snapshot;
use crate::traits::StatusSource;
use std::time::{Duration, Instant};
use tracing::debug;

/// Caches a source's last snapshot and only re-fetches once `min_interval` has elapsed.
///
/// The first call always fetches. A failed fetch leaves the cache and the
/// timestamp untouched, so the next call tries again.
pub struct Throttle<S: StatusSource> {
    source: S,
    min_interval: Duration,
    last_fetch: Option<Instant>,
    cached: Snapshot<S::Status>,
}

impl<S: StatusSource> Throttle<S> {
    pub fn new(source: S, min_interval: Duration) -> Self {
        Self {
            source,
            min_interval,
            last_fetch: None,
            cached: Snapshot::new(),
        }
    }

    /// Return the cached snapshot if it is fresh enough at `now`, else fetch.
    pub async fn maybe_fetch(&mut self, now: Instant) -> Result<Snapshot<S::Status>, PlaywatchError> {
        if let Some(last) = self.last_fetch {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.min_interval {
                debug!(
                    "{}: throttled ({}s of {}s elapsed), reusing cached snapshot",
                    self.source.name(),
                    elapsed.as_secs(),
                    self.min_interval.as_secs()
                );
                return Ok(self.cached.clone());
            }
        }

        let fresh = self.source.fetch().await?;
        self.last_fetch = Some(now);
        self.cached = fresh.clone();
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::HealthStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns the fetch count as the status label.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl StatusSource for CountingSource {
        type Status = HealthStatus;

        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch(&self) -> Result<Snapshot<HealthStatus>, PlaywatchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(PlaywatchError::Fetch("boom".into()));
            }
            let mut snap = Snapshot::new();
            snap.insert("game", HealthStatus::new(&n.to_string()));
            Ok(snap)
        }
    }

    fn throttle(secs: u64, fail: bool) -> (Throttle<CountingSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            calls: calls.clone(),
            fail,
        };
        (Throttle::new(source, Duration::from_secs(secs)), calls)
    }

    #[tokio::test]
    async fn test_first_call_always_fetches() {
        let (mut t, calls) = throttle(3600, false);
        let snap = t.maybe_fetch(Instant::now()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(snap.get("game"), Some(&HealthStatus::new("1")));
    }

    #[tokio::test]
    async fn test_within_interval_returns_cache() {
        let (mut t, calls) = throttle(60, false);
        let start = Instant::now();
        let first = t.maybe_fetch(start).await.unwrap();
        let second = t.maybe_fetch(start + Duration::from_secs(10)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_after_interval_fetches_again() {
        let (mut t, calls) = throttle(60, false);
        let start = Instant::now();
        t.maybe_fetch(start).await.unwrap();
        let second = t.maybe_fetch(start + Duration::from_secs(61)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(second.get("game"), Some(&HealthStatus::new("2")));
    }

    #[tokio::test]
    async fn test_zero_interval_fetches_every_call() {
        let (mut t, calls) = throttle(0, false);
        let now = Instant::now();
        t.maybe_fetch(now).await.unwrap();
        t.maybe_fetch(now).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_retries_next_call() {
        let (mut t, calls) = throttle(60, true);
        let start = Instant::now();
        assert!(t.maybe_fetch(start).await.is_err());
        assert!(t.maybe_fetch(start + Duration::from_secs(1)).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
