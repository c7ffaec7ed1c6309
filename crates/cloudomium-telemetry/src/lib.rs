//! Structured logging and invocation metrics for Cloudomium.
//!
//! - **Logging**: JSON (or pretty) log lines through `tracing-subscriber`
//! - **Metrics**: Prometheus-format invocation metrics via the `metrics` crate
//!
//! The pipeline in `cloudomium-middleware` always emits spans, events and
//! metrics. They go nowhere until [`init_telemetry`] (or the individual
//! `init_*` functions) installs a subscriber and a recorder.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudomium_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::new("get-user").with_environment("production");
//!
//! init_telemetry(&config)?;
//! ```
//!
//! # Metrics Output
//!
//! ```text
//! # TYPE cloudomium_invocations_total counter
//! cloudomium_invocations_total{function="get-user",outcome="success",status="200"} 12
//! cloudomium_invocations_total{function="get-user",outcome="error",status="404"} 3
//! ```

#![doc(html_root_url = "https://docs.rs/cloudomium-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use crate::metrics::{
    init_metrics, record_failure, record_invocation, render_metrics, InFlightGuard,
    InvocationOutcome, MetricsConfig,
};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        "Telemetry initialized"
    );
    Ok(())
}
