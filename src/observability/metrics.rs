//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, matched pattern
//! - `router_request_duration_seconds` (histogram): dispatch latency
//! - `router_routes_registered` (gauge): routes in the active table
//! - `router_config_reloads_total` (counter): hot reloads by outcome
//!
//! # Design Decisions
//! - Requests are labelled by registration pattern, never by raw path
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::MATCHED_ROUTE_PATH_KEY;

/// Label value for requests that matched no route.
pub const UNMATCHED: &str = "none";

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        MATCHED_ROUTE_PATH_KEY => route.to_string()
    )
    .increment(1);

    histogram!(
        "router_request_duration_seconds",
        "method" => method.to_string(),
        MATCHED_ROUTE_PATH_KEY => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_routes(count: usize) {
    gauge!("router_routes_registered").set(count as f64);
}

pub fn record_config_reload(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("router_config_reloads_total", "outcome" => outcome).increment(1);
}
