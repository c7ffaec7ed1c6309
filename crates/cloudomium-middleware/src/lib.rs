//! # Cloudomium Middleware
//!
//! HTTP organizer and execution pipeline for Cloudomium.
//!
//! An [`HttpOrganizer`] collects before-middlewares, after-middlewares and an
//! error handler, then wraps a user handler into an [`HttpFunction`]. Each
//! invocation runs the phases strictly in sequence:
//!
//! ```text
//! event, context ──> before[0..n] ──> handler ──> after[0..n] ──> normalize ──> response
//!                          │             │            │
//!                          └─────────────┴────────────┴──> classify ──> error handler ──> response
//! ```
//!
//! | Phase | Receives | May mutate |
//! |-------|----------|------------|
//! | Before | event, context | context |
//! | Handler | event, context | context, returns the response |
//! | After | event, context, response | context, response |
//!
//! ## Key Features
//!
//! - **Ordered**: middlewares run in registration order, one at a time
//! - **Short-circuit**: the first failure skips every remaining step
//! - **Classified errors**: unclassified failures become generic 500 exceptions
//! - **Normalized bodies**: non-string bodies are serialized to JSON text
//!
//! ## Example
//!
//! ```
//! use cloudomium_core::{Failure, HttpException, HttpResponse, LambdaOrganizer};
//! use cloudomium_middleware::HttpOrganizer;
//! use serde_json::{json, Value};
//!
//! #[derive(Default)]
//! struct Context {
//!     user: Option<String>,
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let function = HttpOrganizer::<Value, Context>::new()
//!     .set_metadata("name", "get-user")
//!     .before_fn("auth", |event, ctx, _response| {
//!         Box::pin(async move {
//!             let Some(user) = event["user"].as_str() else {
//!                 return Err(Failure::from(HttpException::unauthorized()));
//!             };
//!             ctx.user = Some(user.to_string());
//!             Ok(())
//!         })
//!     })
//!     .execute_fn(|_event, ctx| {
//!         Box::pin(async move {
//!             let body = json!({ "user": ctx.user });
//!             Ok(Some(HttpResponse::new(200).with_body(body)))
//!         })
//!     });
//!
//! let response = function.invoke(json!({ "user": "ada" }), Context::default()).await;
//! assert_eq!(response.status_code, Some(200));
//! assert_eq!(response.body_text(), Some(r#"{"user":"ada"}"#));
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/cloudomium-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error_handler;
pub mod http;
pub mod phase;

pub use error_handler::{error_body, DefaultHttpErrorHandler, DEFAULT_ERROR_STATUS, ERROR_NAME};
pub use http::{HttpFunction, HttpOrganizer, ANONYMOUS_FUNCTION, NAME_METADATA_KEY};
pub use phase::Phase;
