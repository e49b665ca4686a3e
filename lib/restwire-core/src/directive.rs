//! Per-parameter serialization metadata.
//!
//! An [`EncodingDirective`] carries the `OpenAPI` `in`, `style`, `explode`,
//! `allowReserved` and `contentType` settings of a parameter or body field.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::TypeSchema;

/// Where a value is sent in the HTTP request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    /// Query string (e.g., `?limit=10`).
    #[default]
    Query,
    /// Header value.
    Header,
    /// Path segment (e.g., `/users/{id}`).
    Path,
    /// `Cookie` header entry.
    Cookie,
    /// Field of a form or multipart body.
    FormField,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Path => write!(f, "path"),
            Self::Cookie => write!(f, "cookie"),
            Self::FormField => write!(f, "formField"),
        }
    }
}

/// Serialization style for composite values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Style {
    /// Ampersand-separated values (`id=3&id=4` or `id=3,4`).
    #[default]
    Form,
    /// Space-separated array values.
    SpaceDelimited,
    /// Pipe-separated array values.
    PipeDelimited,
    /// Bracketed keys (`id[role]=admin`).
    DeepObject,
}

impl Style {
    /// Separator between values of a non-exploded parameter.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Form | Self::DeepObject => ',',
            Self::SpaceDelimited => ' ',
            Self::PipeDelimited => '|',
        }
    }
}

/// Serialization metadata of one parameter or body field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingDirective {
    /// Wire-level parameter or field name.
    pub name: String,
    /// Where the value goes.
    #[serde(default, rename = "in")]
    pub location: Location,
    /// Serialization style.
    #[serde(default)]
    pub style: Style,
    /// Explicit explode flag; the default depends on [`Self::style`].
    #[serde(default)]
    pub explode: Option<bool>,
    /// Emit reserved characters unescaped in the query string.
    #[serde(default)]
    pub allow_reserved: bool,
    /// Content types of a multipart part.
    #[serde(default)]
    pub content_type: Option<Vec<String>>,
    /// Headers of a multipart part.
    #[serde(default)]
    pub headers: IndexMap<String, HeaderDirective>,
}

impl EncodingDirective {
    /// Create a directive with default style for the given name and location.
    #[must_use]
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            ..Self::default()
        }
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the explode flag.
    #[must_use]
    pub fn with_explode(mut self, explode: bool) -> Self {
        self.explode = Some(explode);
        self
    }

    /// Set the allow-reserved flag.
    #[must_use]
    pub fn with_allow_reserved(mut self, allow_reserved: bool) -> Self {
        self.allow_reserved = allow_reserved;
        self
    }

    /// Set the part content types.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type
            .get_or_insert_with(Vec::new)
            .push(content_type.into());
        self
    }

    /// Add a part header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, header: HeaderDirective) -> Self {
        self.headers.insert(name.into(), header);
        self
    }

    /// Effective explode flag: `true` for form style unless set otherwise.
    #[must_use]
    pub fn explode(&self) -> bool {
        self.explode.unwrap_or(matches!(self.style, Style::Form))
    }

    /// First declared content type.
    #[must_use]
    pub fn primary_content_type(&self) -> Option<&str> {
        self.content_type
            .as_ref()
            .and_then(|types| types.first())
            .map(String::as_str)
    }

    /// Returns `true` if the declared content types allow a JSON payload.
    ///
    /// No declaration means JSON is allowed.
    #[must_use]
    pub fn accepts_json(&self) -> bool {
        self.content_type.as_ref().is_none_or(|types| {
            types
                .iter()
                .any(|content_type| crate::body::is_json_content_type(content_type))
        })
    }
}

/// A multipart part header whose value comes from an operation argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDirective {
    /// Name of the argument holding the header value.
    pub argument_name: String,
    /// Schema of the argument.
    pub schema: TypeSchema,
    /// Explode flag for composite header values.
    #[serde(default)]
    pub explode: bool,
}

impl HeaderDirective {
    /// Create a header directive.
    #[must_use]
    pub fn new(argument_name: impl Into<String>, schema: TypeSchema) -> Self {
        Self {
            argument_name: argument_name.into(),
            schema,
            explode: false,
        }
    }
}
