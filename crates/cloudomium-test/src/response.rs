//! Test response wrapper.

use crate::error::TestError;
use cloudomium_core::HttpResponse;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A function response with helper methods for assertions.
///
/// # Example
///
/// ```
/// use cloudomium_core::HttpResponse;
/// use cloudomium_test::TestResponse;
/// use serde_json::json;
///
/// let response = TestResponse::from(
///     HttpResponse::new(200)
///         .with_header("Cache-Control", "no-cache")
///         .with_body(r#"{"ok":true}"#),
/// );
///
/// response
///     .assert_status_code(200)
///     .assert_header("cache-control", "no-cache")
///     .assert_json_eq(&json!({ "ok": true }));
/// ```
#[derive(Clone, PartialEq)]
pub struct TestResponse {
    status_code: Option<u16>,
    headers: HashMap<String, String>,
    body: Option<Value>,
}

impl TestResponse {
    /// Creates a test response from its wire JSON document.
    pub fn from_wire(wire: Value) -> Result<Self, TestError> {
        let response: HttpResponse = serde_json::from_value(wire)?;
        Ok(Self::from(response))
    }

    /// Returns the status code, if set.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Returns the status code as an `http::StatusCode`, if set and valid.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status_code
            .and_then(|code| StatusCode::from_u16(code).ok())
    }

    /// Returns true if the status is successful (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status().is_some_and(|status| status.is_success())
    }

    /// Returns true if the status is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| status.is_client_error())
    }

    /// Returns true if the status is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| status.is_server_error())
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Gets a header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the body text.
    ///
    /// Fails if the body is absent or was never normalized to a string.
    pub fn text(&self) -> Result<&str, TestError> {
        match &self.body {
            None => Err(TestError::MissingBody),
            Some(Value::String(text)) => Ok(text.as_str()),
            Some(other) => Err(TestError::BodyNotText(other.to_string())),
        }
    }

    /// Deserializes the body text as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_str(self.text()?)?)
    }

    /// Deserializes the body text as a JSON Value.
    pub fn json_value(&self) -> Result<Value, TestError> {
        self.json()
    }

    // Assertion methods

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the status code is absent or doesn't match.
    pub fn assert_status_code(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status_code,
            Some(expected),
            "Expected status {}, got {:?}",
            expected,
            self.status_code
        );
        self
    }

    /// Asserts the untouched provisional response: `204` and no body.
    ///
    /// # Panics
    ///
    /// Panics if the status is not `204` or a body is present.
    pub fn assert_no_content(&self) -> &Self {
        self.assert_status_code(204).assert_body_absent()
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let actual = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(
            actual, expected,
            "Header '{}': expected '{}', got '{}'",
            name, expected, actual
        );
        self
    }

    /// Asserts that a header is not set.
    ///
    /// # Panics
    ///
    /// Panics if the header exists.
    pub fn assert_no_header(&self, name: &str) -> &Self {
        assert!(
            self.header(name).is_none(),
            "Header '{}' should not be set",
            name
        );
        self
    }

    /// Asserts that there is no body.
    ///
    /// # Panics
    ///
    /// Panics if a body is present.
    pub fn assert_body_absent(&self) -> &Self {
        assert!(self.body.is_none(), "Expected no body, got {:?}", self.body);
        self
    }

    /// Asserts that the body text equals the expected string.
    ///
    /// # Panics
    ///
    /// Panics if the body is not text or doesn't match.
    pub fn assert_body_eq(&self, expected: &str) -> &Self {
        let body = self.text().unwrap_or_else(|e| panic!("Body is not text: {e}"));
        assert_eq!(body, expected, "Body mismatch");
        self
    }

    /// Asserts that the JSON body matches the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON text or doesn't match.
    pub fn assert_json_eq(&self, expected: &Value) -> &Self {
        let actual = self
            .json_value()
            .unwrap_or_else(|e| panic!("Body should be JSON text: {e}"));
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }

    /// Asserts that a JSON field exists and equals the expected value.
    ///
    /// Paths are dot separated; numeric segments index arrays.
    ///
    /// # Panics
    ///
    /// Panics if the field doesn't exist or doesn't match.
    pub fn assert_json_field(&self, path: &str, expected: &Value) -> &Self {
        let json = self
            .json_value()
            .unwrap_or_else(|e| panic!("Body should be JSON text: {e}"));
        let actual = json_path(&json, path).unwrap_or_else(|| {
            panic!("JSON path '{}' not found in: {:?}", path, json);
        });
        assert_eq!(
            actual, expected,
            "JSON field '{}': expected {:?}, got {:?}",
            path, expected, actual
        );
        self
    }

    /// Asserts a default error response: `500` with a body of exactly
    /// `{name, message}`.
    ///
    /// # Panics
    ///
    /// Panics if the response doesn't match.
    pub fn assert_error(&self, name: &str, message: &str) -> &Self {
        self.assert_status_code(500)
            .assert_json_eq(&serde_json::json!({ "name": name, "message": message }))
    }
}

impl From<HttpResponse> for TestResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status_code: response.status_code,
            headers: response.headers.unwrap_or_default(),
            body: response.body,
        }
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status_code", &self.status_code)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Simple JSON path accessor.
fn json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        if segment.is_empty() {
            continue;
        }
        if let Ok(index) = segment.parse::<usize>() {
            current = current.get(index)?;
        } else {
            current = current.get(segment)?;
        }
    }
    Some(current)
}
