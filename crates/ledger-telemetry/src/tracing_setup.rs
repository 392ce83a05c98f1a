//! `tracing` subscriber setup.
//!
//! One registry with an `EnvFilter` and either a JSON or a pretty fmt layer.
//! Logs go to stderr so stdout stays free for protocol output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    if !config.console_output {
        return tracing_subscriber::registry()
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()));
    }

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Tracing initialized"
    );

    Ok(())
}
