//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive string
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "value-lock".to_string(),
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
    /// - `OTEL_SERVICE_NAME` or `VL_SERVICE_NAME`: Service name (default: value-lock)
    /// - `VL_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `VL_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `VL_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .or_else(|_| env::var("VL_SERVICE_NAME"))
                .unwrap_or_else(|_| "value-lock".to_string()),

            log_level: env::var("VL_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("VL_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("VL_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),
        }
    }

    /// Builder method to override the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Builder method to switch JSON output on or off.
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// `"false"`/`"0"`/`"no"`/`"off"` are false, anything else is true.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
