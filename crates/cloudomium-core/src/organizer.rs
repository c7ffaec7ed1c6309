//! Protocol-agnostic organizer state.
//!
//! An [`Organizer`] holds everything configured for one serverless function:
//! free-form metadata, the ordered before/after middleware lists and the
//! error handler. It has no execution logic; protocol specializations (such
//! as the HTTP organizer in `cloudomium-middleware`) embed it and implement
//! [`LambdaOrganizer`] to inherit the registration methods.
//!
//! Registration is append-only and insertion order is execution order. The
//! last registered error handler wins.

use crate::error::{CloudomiumResult, HttpException};
use crate::handler::{BoxFuture, ErrorHandler, FnErrorHandler, FnMiddleware, Middleware};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware<E, C, R> = Arc<dyn Middleware<E, C, R>>;

/// A type-erased error handler.
pub type BoxedErrorHandler<E, C, R> = Arc<dyn ErrorHandler<E, C, R>>;

/// Configuration state of one serverless function.
///
/// Generic over the event `E`, the context `C` and the response `R`; none of
/// them is interpreted at this layer.
pub struct Organizer<E, C, R> {
    metadata: HashMap<String, Value>,
    before: Vec<BoxedMiddleware<E, C, R>>,
    after: Vec<BoxedMiddleware<E, C, R>>,
    error_handler: Option<BoxedErrorHandler<E, C, R>>,
}

impl<E, C, R> Organizer<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    /// Creates an empty organizer with no error handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: HashMap::new(),
            before: Vec::new(),
            after: Vec::new(),
            error_handler: None,
        }
    }

    /// Returns the before-phase middlewares in execution order.
    #[must_use]
    pub fn before_middlewares(&self) -> &[BoxedMiddleware<E, C, R>] {
        &self.before
    }

    /// Returns the after-phase middlewares in execution order.
    #[must_use]
    pub fn after_middlewares(&self) -> &[BoxedMiddleware<E, C, R>] {
        &self.after
    }

    /// Returns the registered error handler.
    #[must_use]
    pub fn error_handler(&self) -> Option<&BoxedErrorHandler<E, C, R>> {
        self.error_handler.as_ref()
    }

    /// Returns the names of all middlewares, before-phase first.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(|middleware| middleware.name())
            .collect()
    }

    /// Returns the number of registered middlewares.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Returns a metadata value.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub(crate) fn insert_metadata(&mut self, key: String, value: Value) {
        self.metadata.insert(key, value);
    }

    pub(crate) fn push_before(&mut self, middleware: BoxedMiddleware<E, C, R>) {
        self.before.push(middleware);
    }

    pub(crate) fn push_after(&mut self, middleware: BoxedMiddleware<E, C, R>) {
        self.after.push(middleware);
    }

    pub(crate) fn replace_error_handler(&mut self, handler: BoxedErrorHandler<E, C, R>) {
        self.error_handler = Some(handler);
    }
}

impl<E, C, R> Default for Organizer<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C, R> std::fmt::Debug for Organizer<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Organizer")
            .field("metadata", &self.metadata)
            .field("before", &self.before.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("after", &self.after.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}

/// Registration methods shared by every organizer.
///
/// Implementors only expose their embedded [`Organizer`]; all chaining
/// methods are provided.
///
/// # Example
///
/// ```
/// use cloudomium_core::{HttpResponse, LambdaOrganizer, Organizer};
/// use serde_json::{json, Value};
///
/// #[derive(Default)]
/// struct Context {
///     language: Option<String>,
/// }
///
/// let organizer = Organizer::<Value, Context, HttpResponse>::new()
///     .set_metadata("name", "get-user")
///     .set_metadata("retries", 0)
///     .before_fn("language", |_event, ctx, _response| {
///         Box::pin(async move {
///             ctx.language = Some("en".to_string());
///             Ok(())
///         })
///     });
///
/// assert_eq!(organizer.metadata("name"), Some(&json!("get-user")));
/// assert_eq!(organizer.metadata("retries"), Some(&json!(0)));
/// assert_eq!(organizer.organizer().middleware_names(), vec!["language"]);
/// ```
pub trait LambdaOrganizer<E, C, R>: Sized
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: Send + 'static,
{
    /// Returns the embedded organizer state.
    fn organizer(&self) -> &Organizer<E, C, R>;

    /// Returns the embedded organizer state mutably.
    fn organizer_mut(&mut self) -> &mut Organizer<E, C, R>;

    /// Returns a metadata value, or `None` if it was never set.
    fn metadata(&self, key: &str) -> Option<&Value> {
        self.organizer().metadata(key)
    }

    /// Stores a metadata value. Any value is stored, including `0`, `false`
    /// and empty strings.
    #[must_use]
    fn set_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.organizer_mut().insert_metadata(key.into(), value.into());
        self
    }

    /// Appends a middleware to the before phase.
    #[must_use]
    fn before<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<E, C, R>,
    {
        self.organizer_mut().push_before(Arc::new(middleware));
        self
    }

    /// Appends a closure to the before phase.
    #[must_use]
    fn before_fn<F>(self, name: &'static str, func: F) -> Self
    where
        F: for<'a> Fn(&'a E, &'a mut C, Option<&'a mut R>) -> BoxFuture<'a, CloudomiumResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.before(FnMiddleware::new(name, func))
    }

    /// Appends a middleware to the after phase.
    #[must_use]
    fn after<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<E, C, R>,
    {
        self.organizer_mut().push_after(Arc::new(middleware));
        self
    }

    /// Appends a closure to the after phase.
    #[must_use]
    fn after_fn<F>(self, name: &'static str, func: F) -> Self
    where
        F: for<'a> Fn(&'a E, &'a mut C, Option<&'a mut R>) -> BoxFuture<'a, CloudomiumResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.after(FnMiddleware::new(name, func))
    }

    /// Replaces the error handler.
    #[must_use]
    fn error<H>(mut self, handler: H) -> Self
    where
        H: ErrorHandler<E, C, R>,
    {
        self.organizer_mut().replace_error_handler(Arc::new(handler));
        self
    }

    /// Replaces the error handler with a closure.
    #[must_use]
    fn error_fn<F>(self, func: F) -> Self
    where
        F: for<'a> Fn(&'a E, &'a C, HttpException) -> BoxFuture<'a, R> + Send + Sync + 'static,
    {
        self.error(FnErrorHandler::new(func))
    }
}

impl<E, C, R> LambdaOrganizer<E, C, R> for Organizer<E, C, R>
where
    E: Send + Sync + 'static,
    C: Send + 'static,
    R: Send + 'static,
{
    fn organizer(&self) -> &Organizer<E, C, R> {
        self
    }

    fn organizer_mut(&mut self) -> &mut Organizer<E, C, R> {
        self
    }
}
