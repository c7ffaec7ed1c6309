//! Configuration sections.
//!
//! Every section rejects unknown keys and fills missing keys from its
//! `Default` impl, so a file only needs to name what it changes.

use serde::{Deserialize, Serialize};

/// Function identity.
///
/// ```
/// use cloudomium_config::FunctionConfig;
///
/// let function: FunctionConfig = toml::from_str(r#"name = "get-user""#).unwrap();
/// assert_eq!(function.environment, "production");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionConfig {
    /// Labels the invocation span, log lines and metrics.
    pub name: String,

    /// Deployed version, if tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Deployment stage, e.g. `development`, `staging`, `production`.
    pub environment: String,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: "cloudomium-function".to_string(),
            version: None,
            environment: "production".to_string(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line, human-readable output.
    Pretty,
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a log subscriber.
    pub enabled: bool,

    /// Level or `EnvFilter` directive.
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Add source file and line to each event.
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            include_location: false,
        }
    }
}

/// `[metrics]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder.
    pub enabled: bool,

    /// Upper bounds of the invocation duration histogram, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: cloudomium_telemetry::MetricsConfig::default().duration_buckets,
        }
    }
}
