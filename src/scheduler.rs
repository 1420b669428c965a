//! Fixed-interval drive loop for the sync engine.
//!
//! The first cycle fires immediately on startup; each later cycle fires
//! one `poll_interval` after the previous tick. Cycles never overlap:
//! the loop awaits each cycle inline before waiting for the next tick.
//! Cycle errors are logged and the loop keeps going; only cancellation
//! ends it.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::engine::SyncEngine;
use crate::gateway::{StarSource, TaskSink};
use crate::Result;

/// Repeatedly runs poll cycles until cancelled.
pub struct Scheduler<S, T> {
    engine: SyncEngine<S, T>,
    poll_interval: Duration,
}

impl<S: StarSource, T: TaskSink> Scheduler<S, T> {
    /// Build a scheduler driving the given engine.
    #[must_use]
    pub fn new(engine: SyncEngine<S, T>, poll_interval: Duration) -> Self {
        Self {
            engine,
            poll_interval,
        }
    }

    /// Run cycles until `cancel` fires.
    ///
    /// Tick spacing is fixed at `poll_interval`, measured tick-to-tick;
    /// a cycle that overruns the interval delays the next tick rather
    /// than bursting to catch up.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.engine.run_cycle().await {
                        Ok(report) => info!(
                            processed = report.processed,
                            skipped = report.skipped,
                            failed = report.failed,
                            "poll cycle complete"
                        ),
                        Err(err) => error!(%err, "poll cycle failed"),
                    }
                }
            }
        }
    }

    /// Run exactly one cycle and return its outcome.
    ///
    /// # Errors
    ///
    /// Propagates a cycle-level failure so a one-shot invocation can
    /// exit nonzero.
    pub async fn run_once(&self) -> Result<()> {
        let report = self.engine.run_cycle().await?;
        info!(
            processed = report.processed,
            skipped = report.skipped,
            failed = report.failed,
            "poll cycle complete"
        );
        Ok(())
    }
}
