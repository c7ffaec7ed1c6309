//! Middleware, handler and error-handler contracts.
//!
//! Every step of an invocation is an async function over borrowed pipeline
//! state. The event is shared, the context (and, after the handler, the
//! response) is lent mutably for the duration of a single step.
//!
//! | Contract | Receives | Completes with |
//! |---|---|---|
//! | [`Middleware`] | `(event, context, response?)` | `Result<(), Failure>` |
//! | [`Handler`] | `(event, context)` | `Result<Option<R>, Failure>` |
//! | [`ErrorHandler`] | `(event, context, exception)` | `R` |
//!
//! Closures can be used through [`FnMiddleware`], [`FnHandler`] and
//! [`FnErrorHandler`], or registered directly with the `*_fn` methods of
//! [`LambdaOrganizer`](crate::LambdaOrganizer), which lets the compiler infer
//! the closure argument types.

use crate::error::{CloudomiumResult, HttpException};
use std::future::Future;
use std::pin::Pin;

/// A boxed future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A function run before or after the handler.
///
/// Before-phase middlewares receive `None` for the response and are expected
/// to enrich the context. After-phase middlewares receive the response and
/// are expected to mutate it in place.
///
/// # Example
///
/// ```
/// use cloudomium_core::{BoxFuture, CloudomiumResult, HttpResponse, Middleware};
///
/// struct NoStore;
///
/// impl<E: Sync, C: Send> Middleware<E, C, HttpResponse> for NoStore {
///     fn name(&self) -> &'static str {
///         "no_store"
///     }
///
///     fn process<'a>(
///         &'a self,
///         _event: &'a E,
///         _context: &'a mut C,
///         response: Option<&'a mut HttpResponse>,
///     ) -> BoxFuture<'a, CloudomiumResult<()>> {
///         Box::pin(async move {
///             if let Some(response) = response {
///                 response.insert_header("Cache-Control", "no-store");
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Middleware<E, C, R>: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs.
    fn name(&self) -> &'static str;

    /// Runs the middleware.
    fn process<'a>(
        &'a self,
        event: &'a E,
        context: &'a mut C,
        response: Option<&'a mut R>,
    ) -> BoxFuture<'a, CloudomiumResult<()>>;
}

/// The user function implementing the endpoint.
///
/// Returning `Ok(None)` keeps the provisional response.
pub trait Handler<E, C, R>: Send + Sync + 'static {
    /// Handles one invocation.
    fn call<'a>(&'a self, event: &'a E, context: &'a mut C)
        -> BoxFuture<'a, CloudomiumResult<Option<R>>>;
}

/// Turns a classified exception into the final response.
///
/// Error handlers are infallible: whatever they return is sent to the caller.
pub trait ErrorHandler<E, C, R>: Send + Sync + 'static {
    /// Builds the error response.
    fn handle<'a>(&'a self, event: &'a E, context: &'a C, exception: HttpException)
        -> BoxFuture<'a, R>;
}

/// A middleware backed by a closure.
///
/// When the closure's argument types cannot be inferred, prefer
/// [`LambdaOrganizer::before_fn`](crate::LambdaOrganizer::before_fn) and
/// [`LambdaOrganizer::after_fn`](crate::LambdaOrganizer::after_fn).
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, E, C, R> Middleware<E, C, R> for FnMiddleware<F>
where
    F: for<'a> Fn(&'a E, &'a mut C, Option<&'a mut R>) -> BoxFuture<'a, CloudomiumResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        event: &'a E,
        context: &'a mut C,
        response: Option<&'a mut R>,
    ) -> BoxFuture<'a, CloudomiumResult<()>> {
        (self.func)(event, context, response)
    }
}

/// A handler backed by a closure.
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Creates a new function-based handler.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, E, C, R> Handler<E, C, R> for FnHandler<F>
where
    F: for<'a> Fn(&'a E, &'a mut C) -> BoxFuture<'a, CloudomiumResult<Option<R>>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        event: &'a E,
        context: &'a mut C,
    ) -> BoxFuture<'a, CloudomiumResult<Option<R>>> {
        (self.func)(event, context)
    }
}

/// An error handler backed by a closure.
pub struct FnErrorHandler<F> {
    func: F,
}

impl<F> FnErrorHandler<F> {
    /// Creates a new function-based error handler.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, E, C, R> ErrorHandler<E, C, R> for FnErrorHandler<F>
where
    F: for<'a> Fn(&'a E, &'a C, HttpException) -> BoxFuture<'a, R> + Send + Sync + 'static,
{
    fn handle<'a>(
        &'a self,
        event: &'a E,
        context: &'a C,
        exception: HttpException,
    ) -> BoxFuture<'a, R> {
        (self.func)(event, context, exception)
    }
}
