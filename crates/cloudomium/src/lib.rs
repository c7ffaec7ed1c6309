//! # Cloudomium
//!
//! Middleware organizer for serverless HTTP functions.
//!
//! This facade re-exports the Cloudomium crates and wires configuration into
//! telemetry and the organizer:
//!
//! - [`core`]: exceptions, failures, middleware and handler traits
//! - [`middleware`]: [`HttpOrganizer`](middleware::HttpOrganizer) and the
//!   invocation pipeline
//! - [`telemetry`]: structured logging and invocation metrics
//! - [`config`]: layered configuration
//!
//! ## Example
//!
//! ```no_run
//! use cloudomium::prelude::*;
//! use serde_json::{json, Value};
//!
//! #[derive(Default)]
//! struct Context;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_production()
//!     .with_optional_file("cloudomium.toml")?
//!     .with_env_prefix("CLOUDOMIUM")
//!     .load()?;
//! cloudomium::init_telemetry(&config)?;
//!
//! let function = cloudomium::organizer::<Value, Context, HttpResponse>(&config)
//!     .execute_fn(|_event, _ctx| {
//!         Box::pin(async { Ok(Some(HttpResponse::new(200).with_body(json!({ "ok": true })))) })
//!     });
//!
//! let response = function.invoke(json!({}), Context).await;
//! assert_eq!(response.status_code, Some(200));
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/cloudomium/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use cloudomium_config as config;
pub use cloudomium_core as core;
pub use cloudomium_middleware as middleware;
pub use cloudomium_telemetry as telemetry;

use cloudomium_config::CloudomiumConfig;
use cloudomium_core::{HttpResponseShape, LambdaOrganizer};
use cloudomium_middleware::{HttpOrganizer, NAME_METADATA_KEY};
use cloudomium_telemetry::TelemetryResult;

/// Metadata key holding the configured function version.
pub const VERSION_METADATA_KEY: &str = "version";

/// Metadata key holding the deployment environment.
pub const ENVIRONMENT_METADATA_KEY: &str = "environment";

/// Prelude module for convenient imports.
///
/// ```
/// use cloudomium::prelude::*;
/// ```
pub mod prelude {
    pub use cloudomium_config::{CloudomiumConfig, ConfigError, ConfigLoader, LogFormat};
    pub use cloudomium_core::{
        BoxFuture, CloudomiumResult, ErrorHandler, ExceptionKind, Failure, Handler, HttpException,
        HttpResponse, HttpResponseShape, LambdaOrganizer, Middleware,
    };
    pub use cloudomium_middleware::{DefaultHttpErrorHandler, HttpFunction, HttpOrganizer, Phase};
    pub use cloudomium_telemetry::{render_metrics, TelemetryError};
}

/// Installs logging and metrics from a loaded configuration.
///
/// Call once per process, before the first invocation.
///
/// # Errors
///
/// Returns `TelemetryError` if the log level is invalid or a global
/// subscriber or recorder is already installed.
pub fn init_telemetry(config: &CloudomiumConfig) -> TelemetryResult<()> {
    cloudomium_telemetry::init_telemetry(&config.telemetry_config())
}

/// Creates an organizer whose metadata carries the configured function
/// identity.
///
/// The function name becomes the `name` metadata entry, which labels the
/// invocation span and metrics. The version is recorded only when set.
#[must_use]
pub fn organizer<E, C, R>(config: &CloudomiumConfig) -> HttpOrganizer<E, C, R>
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: HttpResponseShape,
{
    let function = &config.function;
    tracing::debug!(
        function = %function.name,
        environment = %function.environment,
        "Creating organizer from configuration"
    );

    let organizer = HttpOrganizer::new()
        .set_metadata(NAME_METADATA_KEY, function.name.clone())
        .set_metadata(ENVIRONMENT_METADATA_KEY, function.environment.clone());

    match &function.version {
        Some(version) => organizer.set_metadata(VERSION_METADATA_KEY, version.clone()),
        None => organizer,
    }
}
