//! The reaper: a background task that notices silent participants.
//!
//! Clients poll; the server never pushes. The reaper closes that loop:
//! any participant who has not moved or polled within the staleness
//! threshold is marked disconnected, and a session whose participants
//! are all disconnected is removed. One sweep runs per interval, over
//! every session, with removals applied after the scan.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::RegistryConfig;
use crate::registry::SessionRegistry;

// ---------------------------------------------------------------------------
// Reaper
// ---------------------------------------------------------------------------

/// Recurring liveness sweep over a registry.
///
/// Construct one with the registry it should watch, then
/// [`spawn`](Reaper::spawn) it. The sweep logic itself lives in
/// [`SessionRegistry::sweep_once`]; this type only owns the schedule and
/// the shutdown plumbing.
pub struct Reaper {
    registry: Arc<SessionRegistry>,
    config: RegistryConfig,
}

impl Reaper {
    pub fn new(registry: Arc<SessionRegistry>, config: RegistryConfig) -> Self {
        Self { registry, config }
    }

    /// Spawns the sweep task and returns a handle that stops it.
    ///
    /// The task runs until the handle signals shutdown (or is dropped).
    /// It never aborts mid-sweep: shutdown is observed between cycles,
    /// so a sweep that has started always finishes.
    pub fn spawn(self) -> ReaperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let threshold = Duration::from_secs(self.config.stale_after_secs);
            // Interval periods must be non-zero.
            let period =
                Duration::from_secs(self.config.sweep_interval_secs.max(1));
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                stale_after_secs = self.config.stale_after_secs,
                sweep_interval_secs = self.config.sweep_interval_secs,
                "reaper started"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed =
                            self.registry.sweep_once(threshold).await;
                        if !removed.is_empty() {
                            tracing::debug!(
                                count = removed.len(),
                                "sweep removed abandoned sessions"
                            );
                        }
                    }
                    _ = stop_rx.changed() => break,
                }
            }

            tracing::info!("reaper stopped");
        });

        ReaperHandle {
            stop: stop_tx,
            task,
        }
    }
}

// ---------------------------------------------------------------------------
// ReaperHandle
// ---------------------------------------------------------------------------

/// Handle to a running reaper task.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) also
/// stops the task, just without waiting for it.
pub struct ReaperHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signals the reaper to stop and waits for the current cycle to
    /// finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}
