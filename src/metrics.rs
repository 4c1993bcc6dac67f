//! Prometheus metrics for item operations and HTTP latency.
//!
//! Names are registered once by [`init_metrics`]; recording goes through the
//! `metrics` facade, so it is a no-op until a recorder is installed.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Store operation latency metric name.
pub const METRIC_STORE_OP_LATENCY: &str = "store_operation_latency_ms";
/// Items created counter metric name.
pub const METRIC_ITEMS_CREATED: &str = "items_created_total";
/// Items updated counter metric name.
pub const METRIC_ITEMS_UPDATED: &str = "items_updated_total";
/// Items deleted counter metric name.
pub const METRIC_ITEMS_DELETED: &str = "items_deleted_total";
/// API error responses counter metric name.
pub const METRIC_API_ERRORS: &str = "api_errors_total";

/// Initialize all metric descriptions.
/// Call this once at startup, after installing the recorder.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_STORE_OP_LATENCY,
        "Item store operation latency in milliseconds"
    );

    describe_counter!(METRIC_ITEMS_CREATED, "Total number of items created");
    describe_counter!(METRIC_ITEMS_UPDATED, "Total number of items updated");
    describe_counter!(METRIC_ITEMS_DELETED, "Total number of items deleted");
    describe_counter!(
        METRIC_API_ERRORS,
        "Total number of error responses, by kind"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment items created counter.
pub fn inc_items_created() {
    counter!(METRIC_ITEMS_CREATED).increment(1);
}

/// Increment items updated counter.
pub fn inc_items_updated() {
    counter!(METRIC_ITEMS_UPDATED).increment(1);
}

/// Increment items deleted counter.
pub fn inc_items_deleted() {
    counter!(METRIC_ITEMS_DELETED).increment(1);
}

/// Increment error responses counter.
pub fn inc_api_errors(kind: &'static str) {
    counter!(METRIC_API_ERRORS, "kind" => kind).increment(1);
}

/// RAII guard for timing operations.
/// Records latency, labelled with the operation, when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
    op: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric and operation.
    pub fn new(metric_name: &'static str, op: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
            op,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name, "op" => self.op).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a store operation.
pub fn timer_store_op(op: &'static str) -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_OP_LATENCY, op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = timer_store_op("list");
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 9.0);
    }
}
