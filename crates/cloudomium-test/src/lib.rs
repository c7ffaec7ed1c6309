//! # Cloudomium Test
//!
//! Test utilities for Cloudomium functions.
//!
//! ## Key Features
//!
//! - **Call recording**: [`CallLog`] captures which middlewares ran, in order
//! - **Scripted middlewares**: record, fail or write to the context on demand
//! - **Response assertions**: status, header and JSON-body checks on
//!   [`TestResponse`]
//!
//! ## Example
//!
//! ```ignore
//! use cloudomium::prelude::*;
//! use cloudomium_test::{failing_middleware, recording_middleware, CallLog, TestResponse};
//!
//! #[tokio::test]
//! async fn test_auth_short_circuits() {
//!     let log = CallLog::new();
//!     let function = HttpOrganizer::<Value, ()>::new()
//!         .before(failing_middleware("auth", &log, || HttpException::unauthorized().into()))
//!         .before(recording_middleware("never", &log))
//!         .execute_fn(|_event, _ctx| Box::pin(async { Ok(None) }));
//!
//!     let response = TestResponse::from(function.invoke(Value::Null, ()).await);
//!     response.assert_error("Error", "Unauthorized");
//!     log.assert_calls(&["auth"]);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/cloudomium-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod recorder;
mod response;

pub use error::TestError;
pub use recorder::{
    context_writer, failing_middleware, recording_middleware, CallLog, ScriptedMiddleware,
};
pub use response::TestResponse;
