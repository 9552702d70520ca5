use std::net::SocketAddr;

// ── Refresh ─────────────────────────────────────────────

/// Counter: snapshot refreshes. Labels: status.
pub const REFRESH_TOTAL: &str = "dvrsync_refresh_total";

/// Histogram: refresh latency in seconds, backend round-trips included.
pub const REFRESH_DURATION_SECONDS: &str = "dvrsync_refresh_duration_seconds";

/// Gauge: rules in the current snapshot (templates excluded).
pub const RULES: &str = "dvrsync_rules";

/// Gauge: upcoming instances in the current snapshot.
pub const UPCOMING: &str = "dvrsync_upcoming";

// ── Writes ──────────────────────────────────────────────

/// Counter: backend write calls. Labels: call, status.
pub const BACKEND_WRITES_TOTAL: &str = "dvrsync_backend_writes_total";

/// Counter: timer operations requested by the host. Labels: op, status.
pub const TIMER_OPS_TOTAL: &str = "dvrsync_timer_ops_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Short label for a host status code.
pub fn status_label(status: crate::model::TimerStatus) -> &'static str {
    match status {
        crate::model::TimerStatus::Success => "success",
        crate::model::TimerStatus::Failed => "failed",
        crate::model::TimerStatus::NotImplemented => "not_implemented",
    }
}
