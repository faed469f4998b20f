//! Prometheus request counters.
//!
//! Metric names follow `coldchain_<metric>_total`.
//!
//! | Metric | Labels |
//! |--------|--------|
//! | `coldchain_requests_total` | `entry` (init/invoke/query/delete), `operation`, `outcome` |
//! | `coldchain_notifications_total` | none |

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

/// `outcome` label for a successful request.
pub const OUTCOME_OK: &str = "ok";

lazy_static! {
    /// Registry holding every coldchain metric
    pub static ref REGISTRY: Registry = Registry::new();

    /// Requests handled, by entry point, operation and outcome (`ok` or an error kind)
    pub static ref REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("coldchain_requests_total", "Requests handled by the registry"),
        &["entry", "operation", "outcome"]
    ).expect("metric creation failed");

    /// Notifications delivered to the host
    pub static ref NOTIFICATIONS_TOTAL: IntCounter = IntCounter::new(
        "coldchain_notifications_total",
        "Notifications emitted on the event channel"
    ).expect("metric creation failed");
}

/// Register all metrics with [`REGISTRY`]. Calling it again is a no-op.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REQUESTS_TOTAL.clone()),
        Box::new(NOTIFICATIONS_TOTAL.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Count one handled request.
pub fn record_request(entry: &str, operation: &str, outcome: &str) {
    REQUESTS_TOTAL
        .with_label_values(&[entry, operation, outcome])
        .inc();
}

/// Count notifications seen by the host.
pub fn record_notifications(count: u64) {
    NOTIFICATIONS_TOTAL.inc_by(count);
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
