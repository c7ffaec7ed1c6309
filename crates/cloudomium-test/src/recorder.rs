//! Call recorders and scripted middlewares.
//!
//! Pipeline tests mostly ask "what ran, and in which order?". A [`CallLog`]
//! is a shared, ordered list of labels; the middleware factories below push
//! to it when they run.
//!
//! ```
//! use cloudomium_core::{HttpResponse, LambdaOrganizer, Organizer};
//! use cloudomium_test::{recording_middleware, CallLog};
//!
//! let log = CallLog::new();
//! let organizer = Organizer::<(), (), HttpResponse>::new()
//!     .before(recording_middleware("auth", &log))
//!     .after(recording_middleware("cors", &log));
//!
//! assert_eq!(organizer.middleware_names(), vec!["auth", "cors"]);
//! assert!(log.is_empty());
//! ```

use cloudomium_core::{BoxFuture, CloudomiumResult, Failure, Middleware};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared, ordered record of calls.
///
/// Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a label.
    pub fn record(&self, label: impl Into<String>) {
        self.calls.lock().push(label.into());
    }

    /// Returns a snapshot of all labels in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns `true` if `label` was recorded.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.calls.lock().iter().any(|call| call == label)
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Removes all labels.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Asserts the exact call sequence.
    ///
    /// # Panics
    ///
    /// Panics if the recorded calls differ from `expected`.
    pub fn assert_calls(&self, expected: &[&str]) {
        let calls = self.calls();
        assert_eq!(calls, expected, "Call sequence mismatch");
    }
}

/// How a scripted middleware behaves when it runs.
enum Script<C> {
    Record,
    Fail(Arc<dyn Fn() -> Failure + Send + Sync>),
    Write(Arc<dyn Fn(&mut C) + Send + Sync>),
}

/// A middleware that records its name and then follows a script.
///
/// Built with [`recording_middleware`], [`failing_middleware`] and
/// [`context_writer`].
pub struct ScriptedMiddleware<C> {
    name: &'static str,
    log: CallLog,
    script: Script<C>,
}

impl<C> std::fmt::Debug for ScriptedMiddleware<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<E, C, R> Middleware<E, C, R> for ScriptedMiddleware<C>
where
    E: Sync,
    C: Send + 'static,
    R: Send,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        _event: &'a E,
        context: &'a mut C,
        _response: Option<&'a mut R>,
    ) -> BoxFuture<'a, CloudomiumResult<()>> {
        self.log.record(self.name);
        let result = match &self.script {
            Script::Record => Ok(()),
            Script::Fail(failure) => Err(failure()),
            Script::Write(write) => {
                write(context);
                Ok(())
            }
        };
        Box::pin(async move { result })
    }
}

/// A middleware that only records its name.
#[must_use]
pub fn recording_middleware<C>(name: &'static str, log: &CallLog) -> ScriptedMiddleware<C> {
    ScriptedMiddleware {
        name,
        log: log.clone(),
        script: Script::Record,
    }
}

/// A middleware that records its name and then fails.
///
/// The failure is rebuilt on every run, so the middleware can be invoked
/// repeatedly.
///
/// ```
/// use cloudomium_core::{Failure, HttpException};
/// use cloudomium_test::{failing_middleware, CallLog};
///
/// let log = CallLog::new();
/// let unauthorized = failing_middleware::<(), _>("auth", &log, || {
///     HttpException::unauthorized().into()
/// });
/// let crashing = failing_middleware::<(), _>("db", &log, || Failure::msg("boom"));
/// ```
#[must_use]
pub fn failing_middleware<C, F>(name: &'static str, log: &CallLog, failure: F) -> ScriptedMiddleware<C>
where
    F: Fn() -> Failure + Send + Sync + 'static,
{
    ScriptedMiddleware {
        name,
        log: log.clone(),
        script: Script::Fail(Arc::new(failure)),
    }
}

/// A middleware that records its name and then mutates the context.
#[must_use]
pub fn context_writer<C, F>(name: &'static str, log: &CallLog, write: F) -> ScriptedMiddleware<C>
where
    F: Fn(&mut C) + Send + Sync + 'static,
{
    ScriptedMiddleware {
        name,
        log: log.clone(),
        script: Script::Write(Arc::new(write)),
    }
}
