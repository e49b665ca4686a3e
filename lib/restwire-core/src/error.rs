//! Error types for restwire.

use derive_more::{Display, Error, From};

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for restwire operations.
///
/// Validation errors carry the dotted path of the offending argument and
/// display as `<path>: <reason>`.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A non-nullable field or parameter had no value.
    #[display("{path}: value is required")]
    #[from(skip)]
    RequiredValueMissing {
        /// Dotted path to the missing value.
        path: String,
    },

    /// The runtime value shape disagrees with the declared schema.
    #[display("{path}: expected {expected}, got {actual}")]
    #[from(skip)]
    SchemaMismatch {
        /// Dotted path to the value.
        path: String,
        /// Expected kind (e.g. `object`, `integer`).
        expected: String,
        /// Actual JSON kind of the value.
        actual: &'static str,
    },

    /// A string is not one of the allowed enum values.
    #[display("{path}: invalid enum value {value:?}, expected one of {allowed:?}")]
    #[from(skip)]
    InvalidEnumValue {
        /// Dotted path to the value.
        path: String,
        /// The rejected value.
        value: String,
        /// Allowed values.
        allowed: Vec<String>,
    },

    /// The declared content type has no encoding rule.
    #[display("unsupported content type: {_0}")]
    #[from(skip)]
    UnsupportedContentType(#[error(not(source))] String),

    /// The declared parameter location has no encoding rule.
    #[display("{path}: unsupported parameter location {location}")]
    #[from(skip)]
    UnsupportedLocation {
        /// Parameter name.
        path: String,
        /// The rejected location.
        location: crate::Location,
    },

    /// A parameter value cannot be rendered in its location.
    #[display("{path}: {message}")]
    #[from(skip)]
    UnsupportedParameter {
        /// Parameter name.
        path: String,
        /// Reason.
        message: String,
    },

    /// The request body is required but no value was supplied.
    #[display("{path}: request body is required")]
    #[from(skip)]
    RequiredBodyMissing {
        /// Body argument name.
        path: String,
    },

    /// The request body could not be encoded.
    #[display("{path}: failed to encode body: {message}")]
    #[from(skip)]
    BodyEncoding {
        /// Dotted path to the body field.
        path: String,
        /// Reason.
        message: String,
    },

    /// A header name or value is not valid HTTP.
    #[display("invalid header {name:?}: {message}")]
    #[from(skip)]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Reason.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_urlencoded::ser::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "parameters[0].schema").
        path: String,
        /// Error message.
        message: String,
    },

    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing value error.
    #[must_use]
    pub fn required(path: impl ToString) -> Self {
        Self::RequiredValueMissing {
            path: path.to_string(),
        }
    }

    /// Create a schema mismatch error for the given value.
    #[must_use]
    pub fn mismatch(
        path: impl ToString,
        expected: impl Into<String>,
        actual: &serde_json::Value,
    ) -> Self {
        Self::SchemaMismatch {
            path: path.to_string(),
            expected: expected.into(),
            actual: json_kind(actual),
        }
    }

    /// Create a body encoding error.
    #[must_use]
    pub fn body_encoding(path: impl ToString, message: impl Into<String>) -> Self {
        Self::BodyEncoding {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Create an unsupported parameter error.
    #[must_use]
    pub fn unsupported_parameter(path: impl ToString, message: impl Into<String>) -> Self {
        Self::UnsupportedParameter {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the error comes from validating or encoding the
    /// arguments, as opposed to executing the request.
    ///
    /// These errors are deterministic: re-running the same call fails the same way.
    #[must_use]
    pub const fn is_encoding(&self) -> bool {
        !matches!(
            self,
            Self::Http { .. } | Self::Connection(_) | Self::Tls(_) | Self::Timeout
        )
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Name of the JSON kind of a value, as used in mismatch messages.
#[must_use]
pub(crate) const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
