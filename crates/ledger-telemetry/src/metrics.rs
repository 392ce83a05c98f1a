//! Prometheus metrics for contract invocations.
//!
//! All metrics follow the naming convention: `lc_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INVOCATION METRICS
    // =========================================================================

    /// Invocations by contract, operation and response status
    pub static ref INVOCATIONS: CounterVec = CounterVec::new(
        Opts::new("lc_invocations_total", "Contract invocations by outcome"),
        &["contract", "operation", "status"]
    ).expect("metric creation failed");

    /// Time from dispatch to response
    pub static ref INVOCATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "lc_invocation_duration_seconds",
            "Time spent handling an invocation"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");

    /// Handler errors by kind
    pub static ref CONTRACT_ERRORS: CounterVec = CounterVec::new(
        Opts::new("lc_contract_errors_total", "Handler errors by kind"),
        &["contract", "kind"]
    ).expect("metric creation failed");

    // =========================================================================
    // COMMIT METRICS
    // =========================================================================

    /// Commit attempts by outcome (committed / conflict / read_only)
    pub static ref COMMITS: CounterVec = CounterVec::new(
        Opts::new("lc_commits_total", "Transaction commit outcomes"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Current ledger height
    pub static ref LEDGER_HEIGHT: Gauge = Gauge::new(
        "lc_ledger_height",
        "Number of committed blocks"
    ).expect("metric creation failed");

    /// Commit latency
    pub static ref COMMIT_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "lc_commit_duration_seconds",
            "Time spent validating and applying a transaction"
        ).buckets(exponential_buckets(0.00001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT METRICS
    // =========================================================================

    /// Events published after commit
    pub static ref EVENTS_PUBLISHED: CounterVec = CounterVec::new(
        Opts::new("lc_events_published_total", "Committed events handed to the bus"),
        &["event"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INVOCATIONS.clone()),
        Box::new(INVOCATION_DURATION.clone()),
        Box::new(CONTRACT_ERRORS.clone()),
        Box::new(COMMITS.clone()),
        Box::new(LEDGER_HEIGHT.clone()),
        Box::new(COMMIT_DURATION.clone()),
        Box::new(EVENTS_PUBLISHED.clone()),
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
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
