//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive.
    pub log_level: String,

    /// Whether to write logs at all.
    pub console_output: bool,

    /// JSON formatted logs instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ledger-contracts".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LC_SERVICE_NAME`: Service name (default: ledger-contracts)
    /// - `LC_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `LC_CONSOLE_OUTPUT`: Enable log output (default: true)
    /// - `LC_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("LC_SERVICE_NAME")
                .unwrap_or_else(|_| "ledger-contracts".to_string()),

            log_level: env::var("LC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("LC_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v).unwrap_or(true))
                .unwrap_or(true),

            json_logs: env::var("LC_JSON_LOGS")
                .map(|v| parse_flag(&v).unwrap_or(false))
                .unwrap_or(is_container),
        }
    }

    /// Configuration for a named contract service.
    pub fn for_contract(contract: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("{}-{}", config.service_name, contract);
        config
    }
}

/// Parse a boolean-ish environment value.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "ledger-contracts");
        assert_eq!(config.log_level, "info");
        assert!(config.console_output);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
