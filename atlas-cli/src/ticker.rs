//! Interval tick source.
//!
//! [`Ticker`] is the native counterpart of a browser animation-frame loop:
//! a tokio task that sends the elapsed time since `start` at a fixed period.
//! Missed ticks are skipped rather than bunched up.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A cancellable repeating task that emits elapsed time.
///
/// Starting a running ticker and stopping a stopped one are no-ops. Dropping
/// the ticker stops it.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Create a stopped ticker with the given period.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            handle: None,
        }
    }

    /// Create a stopped ticker firing `fps` times per second.
    #[must_use]
    pub fn with_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    /// Tick period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Whether the ticker task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the ticker task.
    ///
    /// Returns the tick receiver, or `None` if already running. Must be
    /// called inside a tokio runtime.
    pub fn start(&mut self) -> Option<mpsc::Receiver<Duration>> {
        if self.is_running() {
            return None;
        }
        let (tx, rx) = mpsc::channel(1);
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let origin = Instant::now();
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                let at = interval.tick().await;
                if tx.send(at.duration_since(origin)).await.is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(period = ?self.period, "ticker started");
        Some(rx)
    }

    /// Stop the ticker task. Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        let was_running = !handle.is_finished();
        handle.abort();
        if was_running {
            tracing::debug!("ticker stopped");
        }
        was_running
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
