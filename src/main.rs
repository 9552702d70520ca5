use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use dvrsync::backend::{Snapshot, SnapshotBackend};
use dvrsync::config::EngineConfig;
use dvrsync::engine::ScheduleManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("DVRSYNC_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    dvrsync::observability::init(metrics_port)?;

    let snapshot_path = std::env::var("DVRSYNC_SNAPSHOT").unwrap_or_else(|_| "./snapshot.json".into());
    let poll_secs: Option<u64> = std::env::var("DVRSYNC_POLL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|s| *s > 0);

    let config = EngineConfig::from_env();
    let snapshot = Snapshot::load(&PathBuf::from(&snapshot_path))?;
    let backend = Arc::new(SnapshotBackend::new(snapshot));
    let manager = Arc::new(ScheduleManager::connect(backend, config).await?);

    let protocol = manager.protocol_version().await;
    let upcoming = manager.upcoming_count().await;
    info!("dvrsync loaded {snapshot_path}");
    info!("  protocol: {protocol}");
    info!("  upcoming: {upcoming}");
    info!("  metrics: {}", metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    let entries = manager.timer_entries().await;
    println!("{}", serde_json::to_string_pretty(&entries)?);

    let Some(secs) = poll_secs else { return Ok(()) };
    info!("refreshing every {secs}s, ctrl-c to stop");
    let refresher = tokio::spawn(dvrsync::refresh::run_refresher(manager.clone(), Duration::from_secs(secs)));
    tokio::signal::ctrl_c().await?;
    refresher.abort();
    info!("dvrsync stopped");
    Ok(())
}
