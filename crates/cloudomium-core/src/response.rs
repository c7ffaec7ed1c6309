//! HTTP response shapes.
//!
//! The pipeline treats responses as opaque values. It only needs to create
//! the provisional `204` response, build error responses, normalize the body
//! and read the status code for metrics. [`HttpResponseShape`] captures
//! exactly that.
//!
//! [`HttpResponse`] is the default concrete shape. Its wire form uses the
//! camelCase field names serverless HTTP integrations expect:
//!
//! ```json
//! { "statusCode": 200, "headers": { "Cache-Control": "no-cache" }, "body": "{\"ok\":true}" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Status code of the provisional response used before the handler runs.
pub const NO_CONTENT: u16 = 204;

/// Operations the pipeline needs from a response type.
pub trait HttpResponseShape: Send + 'static {
    /// The provisional response returned when the handler produces nothing.
    fn provisional() -> Self;

    /// Builds a response with a status code and an already serialized body.
    fn from_parts(status_code: u16, body: String) -> Self;

    /// Replaces a present, non-string body with its JSON text.
    fn normalize_body(&mut self);

    /// Returns the status code, if one is set.
    fn status_code(&self) -> Option<u16>;
}

/// Default HTTP response shape.
///
/// # Example
///
/// ```
/// use cloudomium_core::{HttpResponse, HttpResponseShape};
/// use serde_json::json;
///
/// let mut response = HttpResponse::new(200).with_body(json!({ "ok": true }));
/// response.normalize_body();
/// assert_eq!(response.body_text(), Some(r#"{"ok":true}"#));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    /// HTTP status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Response headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Response body. Any JSON value until normalized, then a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpResponse {
    /// Creates a response with the given status code and nothing else.
    #[must_use]
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::default()
        }
    }

    /// Creates an empty `204 No Content` response.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(NO_CONTENT)
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body from any serializable value.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Inserts or replaces a header in place.
    pub fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
    }

    /// Returns a header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .map(String::as_str)
    }

    /// Returns the body if it is a string.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_ref().and_then(Value::as_str)
    }
}

impl HttpResponseShape for HttpResponse {
    fn provisional() -> Self {
        Self::no_content()
    }

    fn from_parts(status_code: u16, body: String) -> Self {
        Self::new(status_code).with_body(body)
    }

    fn normalize_body(&mut self) {
        normalize_value(&mut self.body);
    }

    fn status_code(&self) -> Option<u16> {
        self.status_code
    }
}

/// Untyped responses, for handlers that build their result as raw JSON.
///
/// Only a top-level `body` field is ever touched.
impl HttpResponseShape for Value {
    fn provisional() -> Self {
        serde_json::json!({ "statusCode": NO_CONTENT })
    }

    fn from_parts(status_code: u16, body: String) -> Self {
        serde_json::json!({ "statusCode": status_code, "body": body })
    }

    fn normalize_body(&mut self) {
        if let Some(object) = self.as_object_mut() {
            if let Some(body) = object.get_mut("body") {
                if !body.is_string() && !body.is_null() {
                    *body = Value::String(body.to_string());
                }
            }
        }
    }

    fn status_code(&self) -> Option<u16> {
        self.get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }
}

fn normalize_value(body: &mut Option<Value>) {
    match body {
        Some(Value::String(_) | Value::Null) | None => {}
        Some(value) => {
            let text = value.to_string();
            *value = Value::String(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provisional_is_no_content() {
        let response = HttpResponse::provisional();
        assert_eq!(response.status_code, Some(204));
        assert!(response.headers.is_none());
        assert!(response.body.is_none());
    }

    #[test]
    fn test_normalize_object_body() {
        let mut response = HttpResponse::new(200).with_body(json!({ "ok": true }));
        response.normalize_body();
        assert_eq!(response.body, Some(Value::String(r#"{"ok":true}"#.to_string())));
    }

    #[test]
    fn test_normalize_scalar_bodies() {
        let mut number = HttpResponse::new(200).with_body(42);
        number.normalize_body();
        assert_eq!(number.body_text(), Some("42"));

        let mut boolean = HttpResponse::new(200).with_body(false);
        boolean.normalize_body();
        assert_eq!(boolean.body_text(), Some("false"));
    }

    #[test]
    fn test_normalize_leaves_strings_untouched() {
        let mut response = HttpResponse::new(200).with_body(r#"{"already":"text"}"#);
        response.normalize_body();
        assert_eq!(response.body_text(), Some(r#"{"already":"text"}"#));
    }

    #[test]
    fn test_normalize_does_not_introduce_body() {
        let mut response = HttpResponse::new(200);
        response.normalize_body();
        assert!(response.body.is_none());
    }

    #[test]
    fn test_headers() {
        let mut response = HttpResponse::new(200).with_header("Cache-Control", "no-cache");
        response.insert_header("X-App-Language", "en");
        assert_eq!(response.header("Cache-Control"), Some("no-cache"));
        assert_eq!(response.header("X-App-Language"), Some("en"));
        assert_eq!(response.header("Missing"), None);
    }

    #[test]
    fn test_wire_format() {
        let response = HttpResponse::from_parts(500, "{}".to_string());
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire, json!({ "statusCode": 500, "body": "{}" }));
    }

    #[test]
    fn test_value_shape() {
        assert_eq!(Value::provisional(), json!({ "statusCode": 204 }));

        let mut raw = json!({ "statusCode": 200, "body": { "items": [1, 2] } });
        raw.normalize_body();
        assert_eq!(raw["body"], json!(r#"{"items":[1,2]}"#));

        let mut untouched = json!({ "statusCode": 200 });
        untouched.normalize_body();
        assert!(untouched.get("body").is_none());
        assert_eq!(HttpResponseShape::status_code(&untouched), Some(200));
        assert_eq!(HttpResponseShape::status_code(&json!({ "statusCode": "200" })), None);
    }

    #[test]
    fn test_with_json() {
        #[derive(Serialize)]
        struct User {
            id: u32,
        }

        let response = HttpResponse::new(201).with_json(&User { id: 7 }).unwrap();
        assert_eq!(response.body, Some(json!({ "id": 7 })));
    }
}
