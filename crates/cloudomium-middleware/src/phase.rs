//! Pipeline phases.

use std::fmt;

/// A phase of an invocation in which a step can fail.
///
/// Every invocation walks `INIT -> BEFORE -> HANDLER -> AFTER -> NORMALIZE`.
/// Only the three phases below run user code, so only they can divert the
/// invocation to the error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before-middlewares, run in registration order.
    Before,
    /// The user handler.
    Handler,
    /// After-middlewares, run in registration order.
    After,
}

impl Phase {
    /// Returns the phase name used in logs and metric labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::Handler => "handler",
            Self::After => "after",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
