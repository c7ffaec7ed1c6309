//! Root configuration type.
//!
//! This module provides [`CloudomiumConfig`], its builder, and the conversions
//! into the telemetry crate's runtime settings.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, FunctionConfig, LogFormat, LoggingConfig, MetricsConfig};

/// Complete configuration for one Cloudomium function.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to layer files and environment
/// variables on top of the defaults.
///
/// # Example
///
/// ```
/// use cloudomium_config::CloudomiumConfig;
///
/// let config = CloudomiumConfig::default();
/// assert_eq!(config.logging.level, "info");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CloudomiumConfig {
    /// Function identity.
    #[serde(default)]
    pub function: FunctionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl CloudomiumConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use cloudomium_config::{CloudomiumConfig, FunctionConfig};
    ///
    /// let config = CloudomiumConfig::builder()
    ///     .function(FunctionConfig {
    ///         name: "create-order".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.function.name, "create-order");
    /// ```
    #[must_use]
    pub fn builder() -> CloudomiumConfigBuilder {
        CloudomiumConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The function name is blank
    /// - The log level is not a valid filter directive
    /// - Metrics are enabled with empty or unsorted duration buckets
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.function.name.trim().is_empty() {
            return Err(ConfigError::invalid(
                "function.name",
                "must not be empty",
            ));
        }

        if self.logging.enabled {
            cloudomium_telemetry::logging::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid("logging.level", e.to_string()))?;
        }

        if self.metrics.enabled {
            let buckets = &self.metrics.duration_buckets;
            if buckets.is_empty() {
                return Err(ConfigError::invalid(
                    "metrics.duration_buckets",
                    "must not be empty",
                ));
            }
            if buckets.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(ConfigError::invalid(
                    "metrics.duration_buckets",
                    "must be strictly ascending",
                ));
            }
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations.
    ///
    /// ```
    /// use cloudomium_config::{CloudomiumConfig, LogFormat};
    ///
    /// let config = CloudomiumConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;

        config.function.environment = "development".to_string();

        config
    }

    /// Production preset: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.include_location = false;

        config.function.environment = "production".to_string();

        config
    }

    /// Logging settings for [`cloudomium_telemetry::init_logging`].
    ///
    /// The function name becomes the service name on every log line. Span
    /// events follow the pretty format, since only local runs want them.
    #[must_use]
    pub fn log_config(&self) -> cloudomium_telemetry::LogConfig {
        cloudomium_telemetry::LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            json_format: self.logging.format == LogFormat::Json,
            span_events: self.logging.format == LogFormat::Pretty,
            file_line_info: self.logging.include_location,
            include_target: true,
            service_name: self.function.name.clone(),
        }
    }

    /// Metrics settings for [`cloudomium_telemetry::init_metrics`].
    #[must_use]
    pub fn metrics_config(&self) -> cloudomium_telemetry::MetricsConfig {
        cloudomium_telemetry::MetricsConfig {
            enabled: self.metrics.enabled,
            duration_buckets: self.metrics.duration_buckets.clone(),
        }
    }

    /// Combined telemetry settings for [`cloudomium_telemetry::init_telemetry`].
    #[must_use]
    pub fn telemetry_config(&self) -> cloudomium_telemetry::TelemetryConfig {
        cloudomium_telemetry::TelemetryConfig::new(self.function.name.clone())
            .with_environment(self.function.environment.clone())
            .with_logging(self.log_config())
            .with_metrics(self.metrics_config())
    }
}

/// Builder for [`CloudomiumConfig`].
#[derive(Debug, Default)]
pub struct CloudomiumConfigBuilder {
    function: Option<FunctionConfig>,
    logging: Option<LoggingConfig>,
    metrics: Option<MetricsConfig>,
}

impl CloudomiumConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the function section.
    #[must_use]
    pub fn function(mut self, function: FunctionConfig) -> Self {
        self.function = Some(function);
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> CloudomiumConfig {
        CloudomiumConfig {
            function: self.function.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<CloudomiumConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
