//! Typed configuration for Cloudomium functions.
//!
//! Configuration is layered, with later layers overriding earlier ones:
//!
//! 1. Defaults or a preset ([`CloudomiumConfig::development`],
//!    [`CloudomiumConfig::production`])
//! 2. TOML or JSON files and strings, merged key by key
//! 3. Environment variables (`PREFIX__SECTION__KEY`), optionally seeded from
//!    a `.env` file
//!
//! Unknown fields are rejected at every layer.
//!
//! # Example
//!
//! ```no_run
//! use cloudomium_config::ConfigLoader;
//!
//! # fn main() -> Result<(), cloudomium_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_production()
//!     .with_file("cloudomium.toml")?
//!     .with_env_prefix("CLOUDOMIUM")
//!     .load()?;
//!
//! println!("Starting {}", config.function.name);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [function]
//! name = "get-user"
//! version = "1.4.0"
//! environment = "production"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! include_location = false
//!
//! [metrics]
//! enabled = true
//! duration_buckets = [0.005, 0.05, 0.5, 5.0]
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `CLOUDOMIUM__FUNCTION__NAME=get-user`
//! - `CLOUDOMIUM__LOGGING__LEVEL=cloudomium_middleware=debug,info`
//! - `CLOUDOMIUM__LOGGING__FORMAT=pretty`
//! - `CLOUDOMIUM__METRICS__ENABLED=false`
//! - `CLOUDOMIUM__METRICS__DURATION_BUCKETS=0.01,0.1,1`

#![doc(html_root_url = "https://docs.rs/cloudomium-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{CloudomiumConfig, CloudomiumConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{FunctionConfig, LogFormat, LoggingConfig, MetricsConfig};
