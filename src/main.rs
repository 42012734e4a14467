use anyhow::Result;
use netgraph::*;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let mut tracker = tracker::DeviceTracker::new(
        app_config.graph.history_len,
        app_config.graph.min_scale,
    )
    .map_err(|e| anyhow::anyhow!("tracker init: {}", e))?;
    tracker.set_device_filter(&app_config.graph.dev_names);
    let tracker = Arc::new(Mutex::new(tracker));

    let source: Arc<dyn counter_repo::CounterSource + Send + Sync> =
        Arc::new(counter_repo::SysfsCounterRepo::new());

    let (tx, mut rx) = broadcast::channel::<models::GraphSnapshot>(16);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            tracker,
            source,
            tx,
            shutdown_rx,
        },
        worker::WorkerConfig {
            update_interval_ms: app_config.monitoring.update_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    tracing::info!(
        update_interval_ms = app_config.monitoring.update_interval_ms,
        history_len = app_config.graph.history_len,
        "sampling started"
    );

    tokio::select! {
        _ = async {
            while let Ok(snapshot) = rx.recv().await {
                tracing::debug!(scale = snapshot.scale, tooltip = %snapshot.tooltip, "tick");
            }
        } => {}
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}
