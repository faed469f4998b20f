//! # Cold-Chain Telemetry
//!
//! Logging and metrics for the registry host.
//!
//! ## Components
//!
//! - **Tracing**: `tracing-subscriber` registry with an `EnvFilter`, human or JSON lines on stderr
//! - **Metrics**: Prometheus request and notification counters, text-encoded on demand
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coldchain_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // requests are now logged and counted
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `COLDCHAIN_SERVICE_NAME` | `coldchain-registry` | Service name in the startup log |
//! | `COLDCHAIN_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `COLDCHAIN_CONSOLE_OUTPUT` | `true` | Write log lines at all |
//! | `COLDCHAIN_JSON_LOGS` | `false` | JSON log lines (default `true` in containers) |

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use metrics::{
    encode_metrics, record_notifications, record_request, register_metrics, OUTCOME_OK,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard to hold for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first; registration is idempotent
    register_metrics()?;
    tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs shutdown on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "shutting down telemetry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_once() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::default()
        };
        let guard = init_telemetry(config.clone()).unwrap();

        // The global subscriber is already taken
        assert!(matches!(
            init_telemetry(config),
            Err(TelemetryError::TracingInit(_))
        ));
        drop(guard);
    }
}
