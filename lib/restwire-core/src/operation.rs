//! Translated operation metadata.
//!
//! An [`Operation`] is produced once from the API description and shared
//! read-only by every invocation.

use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::directive::EncodingDirective;
use crate::method::Method;
use crate::schema::TypeSchema;
use crate::security::SecurityRequirement;
use crate::settings::RetryPolicy;
use crate::{Result, from_json};

/// A REST operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation name, used in logs.
    pub name: String,
    /// HTTP method.
    pub method: Method,
    /// URL path template (e.g. `/pets/{petId}`).
    pub path: String,
    /// Path, query, header and cookie parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(default)]
    pub request_body: Option<RequestBodySpec>,
    /// Security requirements; `None` uses the server default.
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
    /// Operation timeout (seconds in JSON).
    #[serde(default, deserialize_with = "crate::settings::seconds")]
    pub timeout: Option<Duration>,
    /// Operation retry policy.
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
}

impl Operation {
    /// Create an operation without parameters nor body.
    #[must_use]
    pub fn new(name: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            parameters: Vec::new(),
            request_body: None,
            security: None,
            timeout: None,
            retry: None,
        }
    }

    /// Load an operation from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::JsonDeserialization`] with the path to the
    /// invalid field.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        from_json(bytes)
    }

    /// Add a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn body(mut self, body: RequestBodySpec) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Set the security requirements.
    #[must_use]
    pub fn security(mut self, security: Vec<SecurityRequirement>) -> Self {
        self.security = Some(security);
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }
}

/// A non-body parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Name of the argument holding the value.
    pub argument_name: String,
    /// Shape of the value.
    pub schema: TypeSchema,
    /// Wire name, location and style.
    #[serde(flatten)]
    pub directive: EncodingDirective,
}

impl Parameter {
    /// Create a parameter whose argument name is its wire name.
    #[must_use]
    pub fn new(schema: TypeSchema, directive: EncodingDirective) -> Self {
        Self {
            argument_name: directive.name.clone(),
            schema,
            directive,
        }
    }

    /// Read the value from another argument.
    #[must_use]
    pub fn with_argument_name(mut self, argument_name: impl Into<String>) -> Self {
        self.argument_name = argument_name.into();
        self
    }
}

fn default_body_argument() -> String {
    "body".to_string()
}

fn default_content_type() -> String {
    "application/json".to_string()
}

/// Request body declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodySpec {
    /// Name of the argument holding the body.
    #[serde(default = "default_body_argument")]
    pub argument_name: String,
    /// Declared content type.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Shape of the body.
    pub schema: TypeSchema,
    /// Per-field encoding of form and multipart bodies.
    #[serde(default)]
    pub encoding: IndexMap<String, EncodingDirective>,
}

impl RequestBodySpec {
    /// Create a body declaration read from the `body` argument.
    #[must_use]
    pub fn new(content_type: impl Into<String>, schema: TypeSchema) -> Self {
        Self {
            argument_name: default_body_argument(),
            content_type: content_type.into(),
            schema,
            encoding: IndexMap::new(),
        }
    }

    /// Set the encoding of one field.
    #[must_use]
    pub fn encoding(mut self, field: impl Into<String>, directive: EncodingDirective) -> Self {
        self.encoding.insert(field.into(), directive);
        self
    }
}
