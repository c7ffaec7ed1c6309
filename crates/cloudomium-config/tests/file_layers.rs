//! File and dotenv layering tests.

use std::io::Write;

use cloudomium_config::{CloudomiumConfig, ConfigError, ConfigLoader, LogFormat};
use tempfile::{Builder, NamedTempFile};

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_toml_file() {
    let file = temp_file(
        ".toml",
        r#"
            [function]
            name = "get-user"
            environment = "staging"

            [logging]
            level = "warn"
            include_location = true

            [metrics]
            duration_buckets = [0.01, 0.1, 1.0]
        "#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert_eq!(config.function.name, "get-user");
    assert_eq!(config.function.environment, "staging");
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.include_location);
    assert_eq!(config.metrics.duration_buckets, vec![0.01, 0.1, 1.0]);
}

#[test]
fn loads_json_file() {
    let file = temp_file(
        ".json",
        r#"{"function": {"name": "list-orders"}, "logging": {"format": "pretty"}}"#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert_eq!(config.function.name, "list-orders");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn optional_file_is_loaded_when_present() {
    let file = temp_file(".toml", "[metrics]\nenabled = false\n");

    let config = ConfigLoader::new()
        .with_optional_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert!(!config.metrics.enabled);
}

#[test]
fn file_layers_merge_over_preset() {
    let base = temp_file(".toml", "[function]\nname = \"get-user\"\n");
    let local = temp_file(".json", r#"{"logging": {"level": "trace"}}"#);

    let config = ConfigLoader::new()
        .with_development()
        .with_file(base.path())
        .unwrap()
        .with_file(local.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.function.name, "get-user");
    assert_eq!(config.function.environment, "development");
    assert_eq!(config.logging.level, "trace");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn unsupported_extension_is_rejected() {
    let file = temp_file(".yaml", "function:\n  name: get-user\n");

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
}

#[test]
fn malformed_file_is_rejected() {
    let file = temp_file(".toml", "[function\nname = ");

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn unknown_section_in_file_is_rejected() {
    let file = temp_file(".json", r#"{"tracing": {"enabled": true}}"#);

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[test]
fn dotenv_file_feeds_env_overrides() {
    let file = temp_file(
        ".env",
        "CLOUDOMIUM_DOTENV_TEST__LOGGING__LEVEL=warn\n\
         CLOUDOMIUM_DOTENV_TEST__FUNCTION__NAME=from-dotenv\n",
    );

    let config = ConfigLoader::new()
        .with_dotenv_file(file.path())
        .unwrap()
        .with_env_prefix("cloudomium_dotenv_test")
        .load()
        .unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.function.name, "from-dotenv");
}

#[test]
fn missing_dotenv_file_is_an_error() {
    let result = ConfigLoader::new().with_dotenv_file("/nonexistent/.env");
    assert!(matches!(result, Err(ConfigError::Dotenv(_))));
}

#[test]
fn env_overrides_apply_without_matching_vars() {
    let config = ConfigLoader::new()
        .with_env_prefix("CLOUDOMIUM_UNUSED_PREFIX")
        .load()
        .unwrap();

    assert_eq!(config, CloudomiumConfig::default());
}
