//! Layered configuration loading.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! presets, files, `.env` files, and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{CloudomiumConfig, ConfigError, LogFormat};

/// Configuration loader with layered approach.
///
/// Layers apply in call order and later layers override earlier ones. Each
/// file or string layer is merged key by key, so a file that only sets
/// `function.name` keeps the logging and metrics values from earlier layers.
/// Environment overrides always apply last, in [`load`](Self::load).
///
/// # Example
///
/// ```no_run
/// use cloudomium_config::ConfigLoader;
///
/// # fn main() -> Result<(), cloudomium_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_production()
///     .with_optional_file("cloudomium.toml")?
///     .with_dotenv()?
///     .with_env_prefix("CLOUDOMIUM")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: CloudomiumConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new loader seeded with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CloudomiumConfig::default(),
            env_prefix: None,
        }
    }

    /// Reset to the default configuration values.
    ///
    /// `new()` already starts from defaults; this discards earlier layers.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = CloudomiumConfig::default();
        self
    }

    /// Reset to the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use cloudomium_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = CloudomiumConfig::development();
        self
    }

    /// Reset to the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = CloudomiumConfig::production();
        self
    }

    /// Merge a configuration file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist or cannot be read
    /// - The extension is neither `toml` nor `json`
    /// - The content is malformed or contains unknown fields
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = ConfigFormat::from_name(extension)?;

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.with_content(&content, format)
    }

    /// Merge a configuration file if it exists; otherwise continue unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Merge configuration from a string in the named format
    /// (`"toml"` or `"json"`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the format is unsupported or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use cloudomium_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [function]
    ///     name = "get-user"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.function.name, "get-user");
    /// ```
    pub fn with_string(self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_name(format)?;
        self.with_content(content, format)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// Variables use the format `PREFIX__SECTION__KEY`, for example
    /// `CLOUDOMIUM__LOGGING__LEVEL=debug` or `CLOUDOMIUM__FUNCTION__NAME=get-user`.
    /// The prefix is matched in upper case.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load `.env` from the current directory or its parents, if present.
    ///
    /// Variables already set in the process environment are not overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if a `.env` file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a specific dotenv file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment value cannot be parsed or the
    /// final configuration fails [`CloudomiumConfig::validate`].
    pub fn load(mut self) -> Result<CloudomiumConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Return the layered configuration without environment overrides or
    /// validation.
    ///
    /// # Example
    ///
    /// ```
    /// use cloudomium_config::ConfigLoader;
    ///
    /// let mut config = ConfigLoader::new().load_unvalidated();
    /// config.function.name = "patched".to_string();
    /// assert!(config.validate().is_ok());
    /// ```
    #[must_use]
    pub fn load_unvalidated(self) -> CloudomiumConfig {
        self.config
    }

    fn with_content(mut self, content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let overlay = format.parse(content)?;

        let mut merged = serde_json::to_value(&self.config)?;
        merge_values(&mut merged, overlay);
        self.config = serde_json::from_value(merged)?;

        Ok(self)
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        // Non-UTF-8 variables cannot match a key and are skipped.
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(key, _)| key.starts_with(&marker));

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let path = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env(key, "expected PREFIX__SECTION__KEY"))?;
        let parts: Vec<&str> = path.split("__").collect();

        let function = &mut self.config.function;
        let logging = &mut self.config.logging;
        let metrics = &mut self.config.metrics;

        match parts.as_slice() {
            ["FUNCTION", "NAME"] => function.name = value.to_string(),
            ["FUNCTION", "VERSION"] => {
                function.version = Some(value.to_string()).filter(|v| !v.is_empty());
            }
            ["FUNCTION", "ENVIRONMENT"] => function.environment = value.to_string(),

            ["LOGGING", "ENABLED"] => logging.enabled = bool_var(key, value)?,
            ["LOGGING", "LEVEL"] => logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                logging.format = match value.to_ascii_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(ConfigError::env(key, "expected json or pretty")),
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => logging.include_location = bool_var(key, value)?,

            ["METRICS", "ENABLED"] => metrics.enabled = bool_var(key, value)?,
            ["METRICS", "DURATION_BUCKETS"] => {
                metrics.duration_buckets = value
                    .split(',')
                    .map(|bucket| bucket.trim().parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| ConfigError::env(key, "expected comma-separated seconds"))?;
            }

            // Unrelated variables may share the prefix.
            _ => {}
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(name.to_string())),
        }
    }

    // Strict parse first so unknown fields and type errors surface with the
    // source format's diagnostics, then return the raw tree for merging.
    fn parse(self, content: &str) -> Result<Value, ConfigError> {
        match self {
            Self::Toml => {
                toml::from_str::<CloudomiumConfig>(content)?;
                Ok(toml::from_str(content)?)
            }
            Self::Json => {
                serde_json::from_str::<CloudomiumConfig>(content)?;
                Ok(serde_json::from_str(content)?)
            }
        }
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env(key, "expected a boolean"))
}
