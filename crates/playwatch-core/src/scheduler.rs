//! Tick scheduler: polls every registered watch and delivers the aggregated changes.
//!
//! Each tick runs all watches one after another and delivers at most one
//! message. Ticks never overlap: `tick` takes `&mut self`, and the run loop
//! only starts the next tick after the previous one (delivery included)
//! has finished. Missed timer ticks are skipped, not queued.

use crate::detector::{Change, ChangeDetector};
use crate::error::PlaywatchError;
use crate::format::Formatter;
use crate::throttle::Throttle;
use crate::traits::{NotificationSink, StatusSource};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// A type-erased (throttle, detector, formatter) triple.
#[async_trait]
pub trait Tracker: Send {
    fn name(&self) -> &str;

    /// Fetch (subject to throttling) and diff against the baseline.
    async fn poll(&mut self, now: Instant) -> Result<Change, PlaywatchError>;
}

/// One status source with its own throttle, baseline, and formatter.
pub struct Watch<S: StatusSource, F> {
    name: String,
    throttle: Throttle<S>,
    detector: ChangeDetector<S::Status>,
    formatter: F,
}

impl<S: StatusSource, F: Formatter<S::Status>> Watch<S, F> {
    pub fn new(name: impl Into<String>, source: S, min_interval: Duration, formatter: F) -> Self {
        Self {
            name: name.into(),
            throttle: Throttle::new(source, min_interval),
            detector: ChangeDetector::new(),
            formatter,
        }
    }

    pub fn detector(&self) -> &ChangeDetector<S::Status> {
        &self.detector
    }
}

#[async_trait]
impl<S, F> Tracker for Watch<S, F>
where
    S: StatusSource + 'static,
    F: Formatter<S::Status> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn poll(&mut self, now: Instant) -> Result<Change, PlaywatchError> {
        let snapshot = self.throttle.maybe_fetch(now).await?;
        self.detector.apply(&snapshot, &self.formatter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Ticking,
    Delivering,
}

/// Drives all registered watches on a fixed interval.
pub struct Scheduler {
    trackers: Vec<Box<dyn Tracker>>,
    state: SchedulerState,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            trackers: Vec::new(),
            state: SchedulerState::Idle,
        }
    }

    /// Add a watch. Messages are aggregated in registration order.
    pub fn register(&mut self, tracker: impl Tracker + 'static) {
        info!("scheduler: registered watch '{}'", tracker.name());
        self.trackers.push(Box::new(tracker));
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Unconditional first fetch for every watch. Establishes baselines; nothing is reported.
    pub async fn seed(&mut self, now: Instant) {
        for tracker in &mut self.trackers {
            match tracker.poll(now).await {
                Ok(_) => info!("{}: baseline seeded", tracker.name()),
                Err(e) => warn!("{}: initial fetch failed, will seed on next tick: {e}", tracker.name()),
            }
        }
    }

    /// Poll every watch and join their messages with blank lines.
    ///
    /// A failing watch is logged and contributes nothing; the others still run.
    pub async fn collect(&mut self, now: Instant) -> Option<String> {
        self.state = SchedulerState::Ticking;
        let mut messages = Vec::new();

        for tracker in &mut self.trackers {
            match tracker.poll(now).await {
                Ok(change) if change.changed => {
                    debug!("{}: {}", tracker.name(), change.message);
                    messages.push(change.message);
                }
                Ok(_) => {}
                Err(e) => error!("{}: skipped this tick: {e}", tracker.name()),
            }
        }

        if messages.is_empty() {
            self.state = SchedulerState::Idle;
            None
        } else {
            Some(messages.join("\n\n"))
        }
    }

    /// Run one full tick: collect, then deliver the aggregate (if any) exactly once.
    ///
    /// Returns the delivered text.
    pub async fn tick(&mut self, now: Instant, sink: &dyn NotificationSink) -> Option<String> {
        let aggregate = self.collect(now).await;

        match aggregate {
            Some(ref text) => {
                self.state = SchedulerState::Delivering;
                info!("sending message: {text}");
                if let Err(e) = sink.deliver(text).await {
                    error!("scheduler: delivery failed: {e}");
                }
            }
            None => info!("no changes, not sending message"),
        }

        self.state = SchedulerState::Idle;
        aggregate
    }

    /// Seed, then tick every `every` until `shutdown` flips to true or its sender drops.
    pub async fn run(
        mut self,
        every: Duration,
        sink: Arc<dyn NotificationSink>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        self.seed(Instant::now()).await;

        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the seed stands in for it.
        ticker.tick().await;

        info!(
            "scheduler: running {} watch(es) every {}s",
            self.trackers.len(),
            every.as_secs()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(Instant::now(), sink.as_ref()).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("scheduler: stopping");
                        break;
                    }
                }
            }
        }
    }
}
