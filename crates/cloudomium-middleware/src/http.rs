//! HTTP organizer and the functions it produces.
//!
//! [`HttpOrganizer`] is configured through the chaining methods of
//! [`LambdaOrganizer`] and then consumed by [`HttpOrganizer::execute`], which
//! freezes the configuration into an [`HttpFunction`]. Each call to
//! [`HttpFunction::invoke`] drives one invocation:
//!
//! ```text
//! INIT ──> BEFORE ──> HANDLER ──> AFTER ──> NORMALIZE ──> DONE
//!            │           │          │
//!            └───────────┴──────────┴──> ERROR ──> DONE
//! ```
//!
//! - **INIT**: the provisional response is `{statusCode: 204}`.
//! - **BEFORE**: before-middlewares run one at a time with the event and
//!   context.
//! - **HANDLER**: a returned response replaces the provisional one in full.
//! - **AFTER**: after-middlewares run one at a time and mutate the response.
//! - **NORMALIZE**: a present, non-string body becomes its JSON text.
//! - **ERROR**: the failure is classified and handed to the error handler,
//!   whose response is returned as is.

use crate::error_handler::DefaultHttpErrorHandler;
use crate::phase::Phase;
use cloudomium_core::{
    BoxFuture, BoxedErrorHandler, CloudomiumResult, Failure, FnHandler, Handler, HttpException,
    HttpResponse, HttpResponseShape, LambdaOrganizer, Organizer,
};
use cloudomium_telemetry::{record_failure, record_invocation, InFlightGuard, InvocationOutcome};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Function name used when the `name` metadata key is not a string.
pub const ANONYMOUS_FUNCTION: &str = "anonymous";

/// Metadata key holding the function name.
pub const NAME_METADATA_KEY: &str = "name";

/// Organizer for serverless HTTP functions.
///
/// Starts with [`DefaultHttpErrorHandler`] registered.
///
/// # Example
///
/// ```
/// use cloudomium_core::{HttpResponse, LambdaOrganizer};
/// use cloudomium_middleware::HttpOrganizer;
/// use serde_json::{json, Value};
///
/// let function = HttpOrganizer::<Value, ()>::new()
///     .set_metadata("name", "health")
///     .after_fn("no_store", |_event, _ctx, response| {
///         Box::pin(async move {
///             if let Some(response) = response {
///                 response.insert_header("Cache-Control", "no-store");
///             }
///             Ok(())
///         })
///     })
///     .execute_fn(|_event, _ctx| {
///         Box::pin(async { Ok(Some(HttpResponse::new(200).with_body(json!({ "ok": true })))) })
///     });
///
/// assert_eq!(function.name(), "health");
/// ```
pub struct HttpOrganizer<E, C, R = HttpResponse> {
    organizer: Organizer<E, C, R>,
}

impl<E, C, R> HttpOrganizer<E, C, R>
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: HttpResponseShape,
{
    /// Creates an organizer with the default error handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            organizer: Organizer::new().error(DefaultHttpErrorHandler),
        }
    }

    /// Freezes the configuration and wraps `handler` into a callable function.
    #[must_use]
    pub fn execute<H>(self, handler: H) -> HttpFunction<E, C, R>
    where
        H: Handler<E, C, R>,
    {
        let name = match self.organizer.metadata(NAME_METADATA_KEY) {
            Some(Value::String(name)) => name.clone(),
            _ => ANONYMOUS_FUNCTION.to_string(),
        };
        let error_handler = self
            .organizer
            .error_handler()
            .cloned()
            .unwrap_or_else(|| Arc::new(DefaultHttpErrorHandler) as BoxedErrorHandler<E, C, R>);

        tracing::debug!(
            function = %name,
            middlewares = ?self.organizer.middleware_names(),
            "Function configured"
        );

        HttpFunction {
            inner: Arc::new(FunctionInner {
                name,
                organizer: self.organizer,
                handler: Box::new(handler),
                error_handler,
            }),
        }
    }

    /// Like [`execute`](Self::execute), for a closure handler.
    #[must_use]
    pub fn execute_fn<F>(self, func: F) -> HttpFunction<E, C, R>
    where
        F: for<'a> Fn(&'a E, &'a mut C) -> BoxFuture<'a, CloudomiumResult<Option<R>>>
            + Send
            + Sync
            + 'static,
    {
        self.execute(FnHandler::new(func))
    }
}

impl<E, C, R> Default for HttpOrganizer<E, C, R>
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: HttpResponseShape,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C, R> LambdaOrganizer<E, C, R> for HttpOrganizer<E, C, R>
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: HttpResponseShape,
{
    fn organizer(&self) -> &Organizer<E, C, R> {
        &self.organizer
    }

    fn organizer_mut(&mut self) -> &mut Organizer<E, C, R> {
        &mut self.organizer
    }
}

impl<E, C, R> fmt::Debug for HttpOrganizer<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpOrganizer")
            .field("organizer", &self.organizer)
            .finish()
    }
}

struct FunctionInner<E, C, R> {
    name: String,
    organizer: Organizer<E, C, R>,
    handler: Box<dyn Handler<E, C, R>>,
    error_handler: BoxedErrorHandler<E, C, R>,
}

/// A configured function, ready to be invoked.
///
/// Cloning is cheap; clones share the same frozen configuration and can be
/// invoked concurrently.
pub struct HttpFunction<E, C, R = HttpResponse> {
    inner: Arc<FunctionInner<E, C, R>>,
}

impl<E, C, R> Clone for HttpFunction<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, C, R> HttpFunction<E, C, R>
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: HttpResponseShape,
{
    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns a metadata value captured when the function was built.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.inner.organizer.metadata(key)
    }

    /// Returns the names of all middlewares, before-phase first.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.inner.organizer.middleware_names()
    }

    /// Runs one invocation and returns the final response.
    ///
    /// Never fails: every failure is classified and turned into a response
    /// by the error handler.
    pub async fn invoke(&self, event: E, context: C) -> R {
        let span = tracing::info_span!("cloudomium.invoke", function = %self.inner.name);
        self.invoke_in_span(event, context).instrument(span).await
    }

    async fn invoke_in_span(&self, event: E, mut context: C) -> R {
        let _in_flight = InFlightGuard::new();
        let start = Instant::now();

        let (response, outcome) = match self.run(&event, &mut context).await {
            Ok(response) => (response, InvocationOutcome::Success),
            Err((phase, failure)) => {
                let exception = self.classify(phase, failure);
                let response = self
                    .inner
                    .error_handler
                    .handle(&event, &context, exception)
                    .await;
                (response, InvocationOutcome::Error)
            }
        };

        let elapsed = start.elapsed();
        let status_code = response.status_code();
        record_invocation(&self.inner.name, outcome, status_code, elapsed);
        tracing::debug!(
            status_code = ?status_code,
            outcome = outcome.as_str(),
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Invocation complete"
        );

        response
    }

    async fn run(&self, event: &E, context: &mut C) -> Result<R, (Phase, Failure)> {
        let organizer = &self.inner.organizer;

        for middleware in organizer.before_middlewares() {
            tracing::debug!(
                phase = Phase::Before.name(),
                middleware = middleware.name(),
                "Running middleware"
            );
            middleware
                .process(event, context, None)
                .await
                .map_err(|failure| (Phase::Before, failure))?;
        }

        let mut response = self
            .inner
            .handler
            .call(event, context)
            .await
            .map_err(|failure| (Phase::Handler, failure))?
            .unwrap_or_else(R::provisional);

        for middleware in organizer.after_middlewares() {
            tracing::debug!(
                phase = Phase::After.name(),
                middleware = middleware.name(),
                "Running middleware"
            );
            middleware
                .process(event, context, Some(&mut response))
                .await
                .map_err(|failure| (Phase::After, failure))?;
        }

        response.normalize_body();
        Ok(response)
    }

    fn classify(&self, phase: Phase, failure: Failure) -> HttpException {
        let classified = failure.is_classified();
        let exception = failure.classify();

        if classified {
            tracing::warn!(
                phase = phase.name(),
                status_code = exception.status_code(),
                exception = exception.name(),
                message = exception.message(),
                "Invocation failed"
            );
        } else {
            tracing::error!(
                phase = phase.name(),
                status_code = exception.status_code(),
                exception = exception.name(),
                message = exception.message(),
                "Invocation failed with an unclassified error"
            );
        }
        record_failure(&self.inner.name, phase.name(), exception.name());

        exception
    }
}

impl<E, C, R> HttpFunction<E, C, R>
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: HttpResponseShape + Serialize,
{
    /// Runs one invocation and returns the response as its wire JSON
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an error if the response cannot be represented as JSON.
    pub async fn invoke_json(&self, event: E, context: C) -> Result<Value, serde_json::Error> {
        let response = self.invoke(event, context).await;
        serde_json::to_value(&response)
    }
}

impl<E, C, R> fmt::Debug for HttpFunction<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFunction")
            .field("name", &self.inner.name)
            .field("organizer", &self.inner.organizer)
            .finish_non_exhaustive()
    }
}
