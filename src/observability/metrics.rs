//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define dispatch metrics (requests, latency, unrouted requests)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_requests_total` (counter): dispatched requests by method, status
//! - `router_request_duration_seconds` (histogram): latency distribution
//! - `router_not_found_total` (counter): requests no route handled
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Recording is a no-op until an exporter is installed

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed dispatch.
pub fn record_dispatch(method: &str, status: u16, started: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "router_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .record(started.elapsed().as_secs_f64());

    if status == "404" {
        metrics::counter!("router_not_found_total").increment(1);
    }
}
