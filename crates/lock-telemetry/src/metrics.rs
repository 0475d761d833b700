//! Prometheus metrics for the value-lock engine.
//!
//! All metrics follow the naming convention: `vl_<metric>_<unit>`
//!
//! - **Counter**: Monotonically increasing value (e.g., deposits_created_total)
//! - **Gauge**: Value that can go up or down (e.g., active_deposits)
//! - **Histogram**: Distribution of values (e.g., lock_duration_minutes)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter,
    IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Metrics registry for the engine
    pub static ref REGISTRY: Registry = Registry::new();

    /// Total deposits created
    pub static ref DEPOSITS_CREATED: IntCounter = IntCounter::new(
        "vl_deposits_created_total",
        "Total number of deposits locked"
    ).expect("metric creation failed");

    /// Withdrawals by the withdrawing party
    pub static ref WITHDRAWALS: IntCounterVec = IntCounterVec::new(
        Opts::new("vl_withdrawals_total", "Total number of completed withdrawals"),
        &["withdrawn_by"]  // depositor / recipient
    ).expect("metric creation failed");

    /// Rejected operations by operation and error code
    pub static ref OPERATIONS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("vl_operations_rejected_total", "Total number of rejected operations"),
        &["operation", "reason"]
    ).expect("metric creation failed");

    /// Deposits currently locked
    pub static ref ACTIVE_DEPOSITS: IntGauge = IntGauge::new(
        "vl_active_deposits",
        "Number of deposits currently locked"
    ).expect("metric creation failed");

    /// Requested lock durations
    pub static ref LOCK_DURATION_MINUTES: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "vl_lock_duration_minutes",
            "Lock durations requested at creation"
        ).buckets(exponential_buckets(1.0, 4.0, 10).unwrap_or_default())
    ).expect("metric creation failed");

    /// Engine operation latency
    pub static ref OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "vl_operation_duration_seconds",
            "Time spent inside engine operations"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).unwrap_or_default()),
        &["operation"]
    ).expect("metric creation failed");
}

/// Register all engine metrics with [`REGISTRY`].
///
/// Safe to call more than once; already-registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(DEPOSITS_CREATED.clone()),
        Box::new(WITHDRAWALS.clone()),
        Box::new(OPERATIONS_REJECTED.clone()),
        Box::new(ACTIVE_DEPOSITS.clone()),
        Box::new(LOCK_DURATION_MINUTES.clone()),
        Box::new(OPERATION_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard that observes elapsed seconds into `OPERATION_DURATION` on drop.
pub struct OperationTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl OperationTimer {
    /// Start timing the named operation.
    pub fn start(operation: &str) -> Self {
        Self {
            histogram: OPERATION_DURATION.with_label_values(&[operation]),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
