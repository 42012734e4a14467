// Background sampling worker: ticks the tracker at the configured interval
// and broadcasts each tick's snapshot to the rendering layer.
//
// The tracker mutex covers the whole tick plus any reconfiguration call, so
// at most one sampling cycle runs at a time.

use crate::counter_repo::CounterSource;
use crate::models::GraphSnapshot;
use crate::tracker::DeviceTracker;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};

/// Rate limit for the "no receivers" notice (avoid logging every tick when
/// nothing is subscribed to the snapshot channel).
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Tracker, counter source, snapshot channel, and shutdown for the worker.
pub struct WorkerDeps {
    pub tracker: Arc<Mutex<DeviceTracker>>,
    pub source: Arc<dyn CounterSource + Send + Sync>,
    pub tx: broadcast::Sender<GraphSnapshot>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config.
pub struct WorkerConfig {
    pub update_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        tracker,
        source,
        tx,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        update_interval_ms,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(update_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last_no_receivers_warn: Option<Instant> = None;

        let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", update_interval_ms);
        let _guard = worker_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let timestamp = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map(|d| d.as_millis() as u64)
                        .unwrap_or_else(|e| {
                            tracing::warn!(
                                error = %e,
                                operation = "get_timestamp",
                                "system time error"
                            );
                            0
                        });

                    let snapshot = {
                        let mut tracker = match tracker.lock() {
                            Ok(t) => t,
                            Err(e) => {
                                tracing::warn!(error = %e, "tracker lock poisoned, stopping worker");
                                break;
                            }
                        };
                        tracker.tick(source.as_ref());
                        tracker.snapshot(timestamp)
                    };

                    if tx.send(snapshot).is_err() {
                        let should_warn = last_no_receivers_warn
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                        if should_warn {
                            tracing::debug!(
                                operation = "broadcast_snapshot",
                                "snapshot channel has no receivers"
                            );
                            last_no_receivers_warn = Some(Instant::now());
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    let (devices, scale) = match tracker.lock() {
                        Ok(t) => (t.devices().len(), t.scale()),
                        Err(_) => break,
                    };
                    tracing::info!(
                        tracked_devices = devices,
                        scale,
                        "app stats"
                    );
                }
            }
        }
    })
}
