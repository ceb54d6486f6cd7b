//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): dispatch outcomes by outcome and rule
//! - `dispatch_rejections_total` (counter): rejections by reason
//! - `dispatch_duration_seconds` (histogram): time spent in the dispatch core
//!
//! # Design Decisions
//! - Low-overhead metric updates via the `metrics` facade
//! - Recording is a no-op until an exporter is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a dispatched request.
pub fn record_dispatch(rule: &str, started: Instant) {
    metrics::counter!(
        "dispatch_requests_total",
        "outcome" => "dispatched",
        "rule" => rule.to_string()
    )
    .increment(1);
    metrics::histogram!("dispatch_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record a rejected request.
pub fn record_rejection(reason: &'static str, started: Instant) {
    metrics::counter!(
        "dispatch_requests_total",
        "outcome" => "rejected",
        "rule" => "none"
    )
    .increment(1);
    metrics::counter!("dispatch_rejections_total", "reason" => reason).increment(1);
    metrics::histogram!("dispatch_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record a dispatched request refused by the transport or authorization policy.
pub fn record_policy_denial(kind: &'static str) {
    metrics::counter!("dispatch_policy_denials_total", "kind" => kind).increment(1);
}
