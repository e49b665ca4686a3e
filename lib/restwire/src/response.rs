//! Buffered HTTP response and result decoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::{HeaderMap, StatusCode, header};
use restwire_core::{Error, Result, from_json, is_json_content_type, media_type};
use serde_json::Value;

/// HTTP response with status, headers, and a fully read body.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Value of the `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`] with the path of the offending field.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        from_json(&self.body)
    }

    /// Body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body into a result value.
    ///
    /// - empty body: `null`
    /// - JSON content types: the parsed document
    /// - `text/*`: a string
    /// - any other content type: the base64-encoded bytes
    /// - no content type: JSON when it parses, else text when it is UTF-8,
    ///   else base64
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`] when a JSON content type carries
    /// an invalid document.
    pub fn decode(&self) -> Result<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }

        let Some(content_type) = self.content_type() else {
            return Ok(self.sniff());
        };

        if is_json_content_type(content_type) {
            self.json()
        } else if media_type(content_type).starts_with("text/") {
            Ok(Value::String(self.text()))
        } else {
            Ok(Value::String(STANDARD.encode(&self.body)))
        }
    }

    fn sniff(&self) -> Value {
        if let Ok(value) = serde_json::from_slice(&self.body) {
            return value;
        }
        match std::str::from_utf8(&self.body) {
            Ok(text) => Value::String(text.to_owned()),
            Err(_) => Value::String(STANDARD.encode(&self.body)),
        }
    }

    /// Convert a non-2xx response into [`Error::Http`], keeping the body.
    ///
    /// # Errors
    ///
    /// Returns the HTTP error when the status is not a success.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned();
        Err(Error::http_with_body(self.status.as_u16(), message, self.body))
    }
}
