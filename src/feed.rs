use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::stats::{LiveStats, MetricsSimulator};
use crate::weather::Weather;

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub period: Duration,
    pub initial: LiveStats,
    pub initial_weather: Weather,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(5),
            initial: LiveStats::default(),
            initial_weather: Weather::Clear,
        }
    }
}

/// One published snapshot of the live counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveFrame {
    pub sequence: u64,
    pub stats: LiveStats,
    pub weather: Weather,
    pub updated_at: DateTime<Utc>,
}

/// Owns the ticking task for one view session. Dropping the handle cancels the
/// task, and no frame is published after cancellation.
pub struct FeedHandle {
    task: Option<JoinHandle<()>>,
    latest: Arc<watch::Sender<LiveFrame>>,
    updates: broadcast::Sender<LiveFrame>,
    cancelled: Arc<AtomicBool>,
}

impl FeedHandle {
    /// Start ticking on the current tokio runtime. The first update arrives one
    /// full period after the call.
    pub fn spawn<R>(settings: FeedSettings, rng: R) -> Self
    where
        R: Rng + Send + 'static,
    {
        let mut simulator =
            MetricsSimulator::new(settings.initial, settings.initial_weather, rng);
        let first = LiveFrame {
            sequence: 0,
            stats: simulator.stats(),
            weather: simulator.weather(),
            updated_at: Utc::now(),
        };
        let (latest, _) = watch::channel(first);
        let latest = Arc::new(latest);
        let (updates, _) = broadcast::channel(64);
        let cancelled = Arc::new(AtomicBool::new(false));
        let latest_tx = latest.clone();
        let updates_tx = updates.clone();
        let stopped = cancelled.clone();
        let period = settings.period;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let (stats, weather) = simulator.advance();
                let frame = LiveFrame {
                    sequence: simulator.ticks(),
                    stats,
                    weather,
                    updated_at: Utc::now(),
                };
                // The flag is read under the watch lock that `cancel` also takes.
                let published = latest_tx.send_if_modified(|current| {
                    if stopped.load(Ordering::Acquire) {
                        return false;
                    }
                    // No subscribers is fine; the latest frame is still kept.
                    let _ = updates_tx.send(frame.clone());
                    *current = frame;
                    true
                });
                if !published {
                    break;
                }
            }
        });
        log::debug!("live feed started with period {period:?}");

        Self {
            task: Some(task),
            latest,
            updates,
            cancelled,
        }
    }

    pub fn latest(&self) -> LiveFrame {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveFrame> {
        self.updates.subscribe()
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }

    /// Stop the ticking task. Calling this more than once does nothing.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            self.latest.send_if_modified(|_| {
                self.cancelled.store(true, Ordering::Release);
                false
            });
            task.abort();
            log::debug!(
                "live feed cancelled after {} updates",
                self.latest.borrow().sequence
            );
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
