//! Combined telemetry settings.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Settings for [`init_telemetry`](crate::init_telemetry).
///
/// ```
/// use cloudomium_telemetry::TelemetryConfig;
///
/// let config = TelemetryConfig::new("get-user")
///     .with_environment("staging")
///     .without_metrics();
///
/// assert_eq!(config.logging.service_name, "get-user");
/// assert!(!config.metrics.enabled);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Function name. Mirrored into `logging.service_name`.
    pub service_name: String,

    /// Deployment environment.
    pub environment: String,

    /// Logging settings.
    pub logging: LogConfig,

    /// Metrics settings.
    pub metrics: MetricsConfig,
}

impl TelemetryConfig {
    /// Default settings for the named function.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        let service_name = service_name.into();
        Self {
            logging: LogConfig {
                service_name: service_name.clone(),
                ..LogConfig::default()
            },
            service_name,
            environment: "production".to_string(),
            metrics: MetricsConfig::default(),
        }
    }

    /// Sets the deployment environment.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Replaces the logging settings, keeping the service name in sync.
    #[must_use]
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = LogConfig {
            service_name: self.service_name.clone(),
            ..logging
        };
        self
    }

    /// Replaces the metrics settings.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = metrics;
        self
    }

    /// Turns the Prometheus recorder off.
    #[must_use]
    pub fn without_metrics(mut self) -> Self {
        self.metrics.enabled = false;
        self
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new("cloudomium")
    }
}
