//! Default HTTP error handler.
//!
//! The default handler turns any exception into a `500` response whose body
//! is the JSON text of `{name, message}`. `name` is always [`ERROR_NAME`];
//! the exception kind only shows up in logs and metrics.
//!
//! ```json
//! { "statusCode": 500, "body": "{\"name\":\"Error\",\"message\":\"Not Found\"}" }
//! ```
//!
//! The exception's own status code is not used either. Register a custom
//! handler with [`LambdaOrganizer::error`](cloudomium_core::LambdaOrganizer::error)
//! to map exceptions to their status codes.

use cloudomium_core::{BoxFuture, ErrorHandler, HttpException, HttpResponseShape};
use serde::Serialize;

/// Status code of every response built by [`DefaultHttpErrorHandler`].
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Value of the `name` field in every default error body.
pub const ERROR_NAME: &str = "Error";

/// Body used if the error body cannot be serialized.
const FALLBACK_ERROR_BODY: &str = r#"{"name":"Error","message":"Internal Server Error"}"#;

#[derive(Serialize)]
struct ErrorBody<'a> {
    name: &'a str,
    message: &'a str,
}

/// Renders the `{name, message}` error body for an exception.
///
/// # Example
///
/// ```
/// use cloudomium_core::HttpException;
/// use cloudomium_middleware::error_body;
///
/// let body = error_body(&HttpException::bad_request().with_message("missing id"));
/// assert_eq!(body, r#"{"name":"Error","message":"missing id"}"#);
/// ```
#[must_use]
pub fn error_body(exception: &HttpException) -> String {
    serde_json::to_string(&ErrorBody {
        name: ERROR_NAME,
        message: exception.message(),
    })
    .unwrap_or_else(|_| FALLBACK_ERROR_BODY.to_string())
}

/// The error handler every [`HttpOrganizer`](crate::HttpOrganizer) starts with.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHttpErrorHandler;

impl DefaultHttpErrorHandler {
    /// Builds the error response for an exception.
    #[must_use]
    pub fn respond<R: HttpResponseShape>(exception: &HttpException) -> R {
        R::from_parts(DEFAULT_ERROR_STATUS, error_body(exception))
    }
}

impl<E, C, R> ErrorHandler<E, C, R> for DefaultHttpErrorHandler
where
    R: HttpResponseShape,
{
    fn handle<'a>(
        &'a self,
        _event: &'a E,
        _context: &'a C,
        exception: HttpException,
    ) -> BoxFuture<'a, R> {
        let response = Self::respond(&exception);
        Box::pin(async move { response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudomium_core::HttpResponse;
    use serde_json::{json, Value};

    #[test]
    fn test_error_body_fields() {
        let body = error_body(&HttpException::internal().with_message("boom"));
        assert_eq!(body, r#"{"name":"Error","message":"boom"}"#);

        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_error_body_escapes_message() {
        let body = error_body(&HttpException::bad_request().with_message(r#"bad "quote""#));
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["message"], json!(r#"bad "quote""#));
    }

    #[test]
    fn test_fallback_body_is_valid_json() {
        let parsed: Value = serde_json::from_str(FALLBACK_ERROR_BODY).unwrap();
        assert_eq!(parsed["name"], json!(ERROR_NAME));
    }

    #[tokio::test]
    async fn test_status_and_name_are_fixed() {
        let handler = DefaultHttpErrorHandler;
        for exception in [
            HttpException::not_found(),
            HttpException::unauthorized(),
            HttpException::with_status(418, "teapot"),
        ] {
            let message = exception.message().to_string();
            let response: HttpResponse =
                ErrorHandler::<(), (), HttpResponse>::handle(&handler, &(), &(), exception).await;
            assert_eq!(response.status_code, Some(500));

            let body: Value = serde_json::from_str(response.body_text().unwrap()).unwrap();
            assert_eq!(body, json!({ "name": "Error", "message": message }));
        }
    }

    #[tokio::test]
    async fn test_untyped_response() {
        let handler = DefaultHttpErrorHandler;
        let response: Value =
            ErrorHandler::<(), (), Value>::handle(&handler, &(), &(), HttpException::forbidden())
                .await;
        assert_eq!(response["statusCode"], json!(500));
        assert_eq!(
            response["body"],
            json!(r#"{"name":"Error","message":"Forbidden"}"#)
        );
    }
}
