use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::ScheduleManager;

/// Background task that periodically rebuilds the schedule snapshot.
/// A failed refresh keeps the previous snapshot and is retried next tick.
pub async fn run_refresher(manager: Arc<ScheduleManager>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        match manager.update().await {
            Ok(()) => {
                let upcoming = manager.upcoming_count().await;
                debug!(upcoming, "schedule refreshed");
            }
            Err(e) => warn!("schedule refresh failed: {e}"),
        }
    }
}
