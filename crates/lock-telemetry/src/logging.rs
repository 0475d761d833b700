//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! pretty (development) or JSON (containers) formatting layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set.
///
/// # Errors
///
/// - `TelemetryError::Config` - the log level is not a valid filter directive
/// - `TelemetryError::AlreadyInitialized` - a global subscriber is already set
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true),
            )
            .try_init(),
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}

/// Initialize logging for tests: compact output captured by the test harness,
/// silently ignoring a subscriber that is already installed.
pub fn init_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
