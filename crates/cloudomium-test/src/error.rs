//! Test error types.

use thiserror::Error;

/// Errors that can occur while inspecting a response.
#[derive(Debug, Error)]
pub enum TestError {
    /// The response has no body.
    #[error("Response has no body")]
    MissingBody,

    /// The body was not normalized to a string.
    #[error("Body is not a string: {0}")]
    BodyNotText(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
