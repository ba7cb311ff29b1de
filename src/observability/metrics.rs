//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by method, status
//! - `proxy_request_duration_seconds` (histogram): time to response headers
//! - `proxy_upstream_reachable` (gauge): 1 = last probe succeeded, 0 = not

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one forwarded request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("proxy_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record the latest probe result.
pub fn record_upstream_reachable(reachable: bool) {
    metrics::gauge!("proxy_upstream_reachable").set(if reachable { 1.0 } else { 0.0 });
}
