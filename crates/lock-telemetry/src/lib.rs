//! # Lock Telemetry
//!
//! Observability for the value-lock engine.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with `EnvFilter`, pretty or JSON output
//! - **Metrics**: Prometheus counters, gauges and histograms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lock_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VL_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `VL_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `VL_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |
//! | `VL_SERVICE_NAME` | `value-lock` | Service name in log fields |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};
pub use metrics::{
    gather_metrics, register_metrics, OperationTimer, ACTIVE_DEPOSITS, DEPOSITS_CREATED,
    LOCK_DURATION_MINUTES, OPERATIONS_REJECTED, OPERATION_DURATION, WITHDRAWALS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Metrics are registered first since that step cannot conflict with an
/// existing global subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
