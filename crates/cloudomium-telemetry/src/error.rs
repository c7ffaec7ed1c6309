//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing the global subscriber or recorder.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log level is not a valid `EnvFilter` directive.
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global tracing subscriber could not be installed.
    #[error("failed to install log subscriber: {0}")]
    LoggingInit(String),

    /// The histogram buckets are unusable.
    #[error("invalid duration buckets: {0}")]
    InvalidBuckets(String),

    /// The Prometheus recorder could not be installed.
    #[error("failed to install metrics recorder: {0}")]
    MetricsInit(String),
}
