//! Exception and failure types for Cloudomium.
//!
//! This module provides the [`HttpException`] type, the classified failure
//! raised by middlewares and handlers, and [`Failure`], the closed sum type
//! that every step of the pipeline returns on error.
//!
//! # Exception kinds
//!
//! | `ExceptionKind` | Status | Default message |
//! |---|---|---|
//! | `Generic` | 500 | "Internal Server Error" |
//! | `NotFound` | 404 | "Not Found" |
//! | `BadRequest` | 400 | "Bad Request" |
//! | `Unauthorized` | 401 | "Unauthorized" |
//! | `Forbidden` | 403 | "Forbidden" |
//! | `NotAcceptable` | 406 | "Not Acceptable" |
//!
//! # Classification
//!
//! A [`Failure`] is either an [`HttpException`] raised on purpose or an
//! unexpected error. [`Failure::classify`] turns both into an exception:
//! classified exceptions pass through untouched, anything else becomes a
//! generic 500 exception carrying the original message.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`Failure`].
pub type CloudomiumResult<T> = Result<T, Failure>;

/// The fixed set of HTTP exception variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// Unclassified server error, or an exception built from a raw status code.
    Generic,
    /// Resource not found.
    NotFound,
    /// Malformed or invalid request.
    BadRequest,
    /// Missing or invalid credentials.
    Unauthorized,
    /// Authenticated but not permitted.
    Forbidden,
    /// No acceptable representation available.
    NotAcceptable,
}

impl ExceptionKind {
    /// Returns the default HTTP status for this kind.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Generic => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        }
    }

    /// Returns the default numeric status code for this kind.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    /// Returns the message used when no override is given.
    #[must_use]
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Generic => "Internal Server Error",
            Self::NotFound => "Not Found",
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotAcceptable => "Not Acceptable",
        }
    }

    /// Returns the exception name used in logs and metrics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generic => "HttpException",
            Self::NotFound => "HttpNotFoundException",
            Self::BadRequest => "HttpBadRequestException",
            Self::Unauthorized => "HttpUnauthorizedException",
            Self::Forbidden => "HttpForbiddenException",
            Self::NotAcceptable => "HttpNotAcceptableException",
        }
    }

    /// Returns all kinds.
    #[must_use]
    pub const fn all() -> [ExceptionKind; 6] {
        [
            Self::Generic,
            Self::NotFound,
            Self::BadRequest,
            Self::Unauthorized,
            Self::Forbidden,
            Self::NotAcceptable,
        ]
    }
}

/// A classified failure carrying an intentional status code.
///
/// Exceptions are built once at the point of failure with the named
/// factories and the `with_*` builders, and are not changed afterwards.
///
/// # Example
///
/// ```
/// use cloudomium_core::{ExceptionKind, HttpException};
///
/// let err = HttpException::not_found().with_message("user 42 does not exist");
/// assert_eq!(err.kind(), ExceptionKind::NotFound);
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.message(), "user 42 does not exist");
///
/// // Empty overrides fall back to the default message
/// let err = HttpException::forbidden().with_message("");
/// assert_eq!(err.message(), "Forbidden");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpException {
    kind: ExceptionKind,
    status_code: u16,
    message: String,
    identifier: Option<String>,
}

impl HttpException {
    /// Creates an exception of the given kind with its default status and message.
    #[must_use]
    pub fn new(kind: ExceptionKind) -> Self {
        Self {
            kind,
            status_code: kind.status_code(),
            message: kind.default_message().to_string(),
            identifier: None,
        }
    }

    /// Creates a generic exception with an explicit status code.
    ///
    /// The message is the generic default until overridden.
    #[must_use]
    pub fn from_status(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::new(ExceptionKind::Generic)
        }
    }

    /// Creates a generic exception with an explicit status code and message.
    #[must_use]
    pub fn with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::from_status(status_code).with_message(message)
    }

    /// Creates a generic 500 exception.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(ExceptionKind::Generic)
    }

    /// Creates a 404 exception.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ExceptionKind::NotFound)
    }

    /// Creates a 400 exception.
    #[must_use]
    pub fn bad_request() -> Self {
        Self::new(ExceptionKind::BadRequest)
    }

    /// Creates a 401 exception.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(ExceptionKind::Unauthorized)
    }

    /// Creates a 403 exception.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(ExceptionKind::Forbidden)
    }

    /// Creates a 406 exception.
    #[must_use]
    pub fn not_acceptable() -> Self {
        Self::new(ExceptionKind::NotAcceptable)
    }

    /// Overrides the message. An empty message keeps the current one.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.is_empty() {
            self.message = message;
        }
        self
    }

    /// Reuses the message of an existing error.
    #[must_use]
    pub fn with_source_message(self, error: &(dyn std::error::Error + 'static)) -> Self {
        self.with_message(error.to_string())
    }

    /// Attaches a free-form classification tag.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Returns the exception kind.
    #[must_use]
    pub const fn kind(&self) -> ExceptionKind {
        self.kind
    }

    /// Returns the HTTP status code carried by this exception.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the message. Never empty.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the classification tag, if any.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Returns the exception name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl Default for HttpException {
    fn default() -> Self {
        Self::internal()
    }
}

/// Any failure returned by a middleware or handler.
///
/// The pipeline never inspects the dynamic type of an error: a step either
/// raises a classified [`HttpException`] or some other error, and the two
/// cases are kept apart by this enum.
///
/// # Example
///
/// ```
/// use cloudomium_core::{Failure, HttpException};
///
/// let classified: Failure = HttpException::bad_request().into();
/// assert_eq!(classified.classify().status_code(), 400);
///
/// let unexpected = Failure::msg("connection reset");
/// let exception = unexpected.classify();
/// assert_eq!(exception.status_code(), 500);
/// assert_eq!(exception.message(), "connection reset");
/// ```
#[derive(Error, Debug)]
pub enum Failure {
    /// A classified exception raised on purpose.
    #[error(transparent)]
    Exception(#[from] HttpException),

    /// Any other error.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl Failure {
    /// Wraps an arbitrary error as an unexpected failure.
    pub fn unexpected<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unexpected(anyhow::Error::new(error))
    }

    /// Creates an unexpected failure from a plain message.
    pub fn msg<M>(message: M) -> Self
    where
        M: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        Self::Unexpected(anyhow::Error::msg(message))
    }

    /// Returns `true` if this failure is a classified exception.
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        matches!(self, Self::Exception(_))
    }

    /// Normalizes this failure into an exception.
    ///
    /// Classified exceptions are returned unchanged. Anything else becomes a
    /// generic 500 exception carrying the original message.
    #[must_use]
    pub fn classify(self) -> HttpException {
        match self {
            Self::Exception(exception) => exception,
            Self::Unexpected(error) => HttpException::internal().with_message(error.to_string()),
        }
    }
}
