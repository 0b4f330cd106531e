//! Metrics collection and exposition.
//!
//! # Metrics
//! - `locutus_watch_tasks_started_total` (counter): by interface
//! - `locutus_watch_tasks_finished_total` (counter): by interface, outcome
//! - `locutus_watch_tasks_active` (gauge): watchers currently running
//! - `locutus_renders_total` (counter): by template, status
//! - `locutus_render_duration_seconds` (histogram): template render latency
//! - `locutus_shutdown_triggered_total` (counter): by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::lifecycle::StopReason;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_watch_started(interface: &str) {
    counter!("locutus_watch_tasks_started_total", "interface" => interface.to_string()).increment(1);
    gauge!("locutus_watch_tasks_active").increment(1.0);
}

pub fn record_watch_finished(interface: &str, outcome: &'static str) {
    counter!(
        "locutus_watch_tasks_finished_total",
        "interface" => interface.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    gauge!("locutus_watch_tasks_active").decrement(1.0);
}

pub fn record_render(template: &str, status: u16, start: Instant) {
    counter!(
        "locutus_renders_total",
        "template" => template.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("locutus_render_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_shutdown(reason: StopReason) {
    counter!("locutus_shutdown_triggered_total", "reason" => reason.as_str()).increment(1);
}
