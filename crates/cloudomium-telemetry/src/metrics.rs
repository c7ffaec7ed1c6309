//! Invocation metrics for Cloudomium.
//!
//! Metrics are recorded through the `metrics` facade and are a no-op until
//! a recorder is installed. [`init_metrics`] installs a Prometheus recorder
//! without an HTTP listener; functions flush [`render_metrics`] output to
//! their logs instead of serving a scrape endpoint.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `cloudomium_invocations_total` | Counter | `function`, `outcome`, `status` | Completed invocations |
//! | `cloudomium_invocation_duration_seconds` | Histogram | `function` | Invocation latency |
//! | `cloudomium_failures_total` | Counter | `function`, `phase`, `kind` | Failures by pipeline phase |
//! | `cloudomium_in_flight_invocations` | Gauge | - | Invocations currently running |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Histogram buckets for invocation duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The pipeline ran to completion.
    Success,
    /// A step failed and the error handler produced the response.
    Error,
}

impl InvocationOutcome {
    /// Returns the label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Installs the global Prometheus recorder.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidBuckets` if no buckets are configured and
/// `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    if config.duration_buckets.is_empty() {
        return Err(TelemetryError::InvalidBuckets(
            "at least one bucket is required".to_string(),
        ));
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(&config.duration_buckets)
        .map_err(|e| TelemetryError::InvalidBuckets(e.to_string()))?
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        "cloudomium_invocations_total",
        "Total number of completed invocations"
    );
    describe_histogram!(
        "cloudomium_invocation_duration_seconds",
        "Invocation duration in seconds"
    );
    describe_counter!(
        "cloudomium_failures_total",
        "Total failures caught by the pipeline, by phase and exception kind"
    );
    describe_gauge!(
        "cloudomium_in_flight_invocations",
        "Number of invocations currently running"
    );
}

/// Records a completed invocation.
pub fn record_invocation(
    function: &str,
    outcome: InvocationOutcome,
    status_code: Option<u16>,
    duration: Duration,
) {
    let status = status_code.map_or_else(|| "none".to_string(), |code| code.to_string());

    counter!(
        "cloudomium_invocations_total",
        "function" => function.to_string(),
        "outcome" => outcome.as_str(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "cloudomium_invocation_duration_seconds",
        "function" => function.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a failure caught in a pipeline phase.
pub fn record_failure(function: &str, phase: &'static str, kind: &'static str) {
    counter!(
        "cloudomium_failures_total",
        "function" => function.to_string(),
        "phase" => phase,
        "kind" => kind
    )
    .increment(1);
}

/// Guard that tracks one in-flight invocation.
///
/// The gauge is decremented on drop, including when the invocation future
/// is dropped early.
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!("cloudomium_in_flight_invocations").increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!("cloudomium_in_flight_invocations").decrement(1.0);
    }
}
