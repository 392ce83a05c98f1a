//! # Ledger Telemetry
//!
//! Structured logging (`tracing`) and Prometheus metrics for the contract
//! runtime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LC_SERVICE_NAME` | `ledger-contracts` | Service name in logs |
//! | `LC_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `LC_JSON_LOGS` | `false` | JSON log lines |
//! | `LC_CONSOLE_OUTPUT` | `true` | Write logs to stderr |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, COMMITS, COMMIT_DURATION, CONTRACT_ERRORS,
    EVENTS_PUBLISHED, INVOCATIONS, INVOCATION_DURATION, LEDGER_HEIGHT,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize metrics and the global tracing subscriber.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Convenience macro for recording a metric with a value.
#[macro_export]
macro_rules! metric_observe {
    ($metric:expr, $value:expr) => {
        $metric.observe($value)
    };
    ($metric:expr, $labels:expr, $value:expr) => {
        $metric.with_label_values($labels).observe($value)
    };
}
