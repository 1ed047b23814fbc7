//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_exchanges_total` (counter): completed exchanges by status
//! - `bridge_exchange_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Prometheus exporter on its own listener, off by default
//! - Low-overhead metric updates (atomic operations)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to start metrics exporter"),
    }
}

/// Record one completed exchange.
pub fn record_exchange(status: u16, start: Instant) {
    counter!("bridge_exchanges_total", "status" => status.to_string()).increment(1);
    histogram!("bridge_exchange_duration_seconds").record(start.elapsed().as_secs_f64());
}
