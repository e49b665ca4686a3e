//! Request body encoding.
//!
//! Dispatches on the declared content type:
//!
//! - `application/json` and `application/*+json`: the value as JSON
//! - `application/x-www-form-urlencoded`: every top-level field rendered with
//!   query style rules and joined with `&`
//! - `multipart/form-data`: one or more parts per top-level field
//! - `text/*`: the plain string form of the value
//! - `application/octet-stream`: bytes decoded from a data URI or base64

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::{HeaderName, HeaderValue};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

use crate::directive::{EncodingDirective, Location, Style};
use crate::encoder::{Encoder, encode_scalar};
use crate::format::{escape_query, header_value, query_entries};
use crate::multipart::{Form, Part};
use crate::operation::RequestBodySpec;
use crate::param::FieldPath;
use crate::schema::{ObjectSchema, Resolved, ScalarKind, SchemaRegistry, TypeSchema};
use crate::{Error, Result};

const JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";
const OCTET_STREAM: &str = "application/octet-stream";

/// Media type without parameters, lowercased: `Text/Plain; charset=utf-8`
/// becomes `text/plain`.
#[must_use]
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Returns `true` for `application/json` and structured-suffix JSON types.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    let media = media_type(content_type);
    media == JSON || (media.starts_with("application/") && media.ends_with("+json"))
}

/// Encoded request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Bytes sent as is.
    Raw {
        /// `Content-Type` header value.
        content_type: String,
        /// Body bytes.
        data: Bytes,
    },
    /// A `multipart/form-data` form, encoded when sent.
    Multipart(Form),
}

impl Payload {
    /// `Content-Type` header value.
    #[must_use]
    pub fn content_type(&self) -> String {
        match self {
            Self::Raw { content_type, .. } => content_type.clone(),
            Self::Multipart(form) => form.content_type(),
        }
    }

    /// Body bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Raw { data, .. } => data.clone(),
            Self::Multipart(form) => form.encode(),
        }
    }
}

/// Decoded binary argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData {
    /// Media type declared by a data URI.
    pub media_type: Option<String>,
    /// Raw bytes.
    pub data: Bytes,
}

/// Decode a binary argument: a data URI (`data:<mime>;base64,<payload>`) or a
/// bare standard base64 string.
pub fn decode_binary(value: &Value, path: &FieldPath<'_>) -> Result<BinaryData> {
    let Value::String(text) = value else {
        return Err(Error::mismatch(path, "binary", value));
    };

    let Some(uri) = text.strip_prefix("data:") else {
        let data = STANDARD
            .decode(text.trim())
            .map_err(|err| Error::body_encoding(path, format!("invalid base64: {err}")))?;
        return Ok(BinaryData {
            media_type: None,
            data: Bytes::from(data),
        });
    };

    let Some((header, payload)) = uri.split_once(',') else {
        return Err(Error::body_encoding(path, "data URI without payload"));
    };
    let (header, base64) = match header.strip_suffix(";base64") {
        Some(header) => (header, true),
        None => (header, false),
    };
    let media_type = header
        .split(';')
        .next()
        .filter(|media| !media.is_empty())
        .map(ToString::to_string);
    let data = if base64 {
        STANDARD
            .decode(payload)
            .map_err(|err| Error::body_encoding(path, format!("invalid base64: {err}")))?
    } else {
        percent_decode_str(payload).collect()
    };

    Ok(BinaryData {
        media_type,
        data: Bytes::from(data),
    })
}

/// Deserialize JSON bytes with path-aware error messages.
///
/// # Errors
///
/// Returns [`Error::JsonDeserialization`] with the path to the offending
/// field (e.g. `parameters[0].schema`).
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| Error::json_deserialization(err.path().to_string(), err.inner().to_string()))
}

/// Builds request bodies from their declared shape and encoding.
#[derive(Debug, Clone)]
pub struct BodyBuilder<'r> {
    registry: &'r SchemaRegistry,
    boundary: Option<String>,
}

impl<'r> BodyBuilder<'r> {
    /// Create a body builder resolving named types through the registry.
    #[must_use]
    pub const fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            boundary: None,
        }
    }

    /// Use a fixed multipart boundary.
    #[must_use]
    pub fn with_boundary(mut self, boundary: Option<String>) -> Self {
        self.boundary = boundary;
        self
    }

    /// Encode the body value.
    ///
    /// `arguments` is the full argument map, read for multipart part headers.
    /// Returns `None` when an optional body is absent.
    ///
    /// # Errors
    ///
    /// - [`Error::RequiredBodyMissing`] if a non-nullable body is absent
    /// - [`Error::UnsupportedContentType`] for content types without a rule
    /// - any encoding error of the value
    pub fn build(
        &self,
        spec: &RequestBodySpec,
        value: Option<&Value>,
        arguments: &Map<String, Value>,
    ) -> Result<Option<Payload>> {
        let Some(value) = value.filter(|value| !value.is_null()) else {
            if spec.schema.is_nullable() {
                return Ok(None);
            }
            return Err(Error::RequiredBodyMissing {
                path: spec.argument_name.clone(),
            });
        };

        let path = FieldPath::root(&spec.argument_name);
        let media = media_type(&spec.content_type);
        let payload = if is_json_content_type(&media) {
            self.validate(&spec.schema, value, &path)?;
            Payload::Raw {
                content_type: spec.content_type.clone(),
                data: Bytes::from(serde_json::to_vec(value)?),
            }
        } else if media == FORM_URLENCODED {
            Payload::Raw {
                content_type: spec.content_type.clone(),
                data: Bytes::from(self.form_urlencoded(spec, value, &path)?),
            }
        } else if media == MULTIPART_FORM_DATA {
            Payload::Multipart(self.multipart(spec, value, arguments, &path)?)
        } else if media.starts_with("text/") {
            Payload::Raw {
                content_type: spec.content_type.clone(),
                data: Bytes::from(encode_scalar(&ScalarKind::Json, value, &path)?),
            }
        } else if media == OCTET_STREAM {
            Payload::Raw {
                content_type: spec.content_type.clone(),
                data: decode_binary(value, &path)?.data,
            }
        } else {
            return Err(Error::UnsupportedContentType(spec.content_type.clone()));
        };
        Ok(Some(payload))
    }

    /// Check required fields and enum values without keeping the items.
    fn validate(&self, schema: &TypeSchema, value: &Value, path: &FieldPath<'_>) -> Result<()> {
        Encoder::new(self.registry).encode(schema, Some(value), path)?;
        Ok(())
    }

    /// Fields of a body object, in schema order.
    ///
    /// A body schema that resolves to an opaque JSON scalar takes the field
    /// names of the value itself.
    fn body_fields<'a>(
        &'a self,
        schema: &'a TypeSchema,
        value: &'a Value,
        path: &FieldPath<'_>,
    ) -> Result<(Cow<'a, ObjectSchema>, &'a Map<String, Value>)> {
        let Value::Object(fields) = value else {
            return Err(Error::mismatch(path, "object", value));
        };
        let object = match self.registry.resolve(SchemaRegistry::unwrap_nullable(schema)) {
            Resolved::Object(object) => Cow::Borrowed(object),
            Resolved::Scalar(ScalarKind::Json) => Cow::Owned(
                fields
                    .keys()
                    .fold(ObjectSchema::new(), |object, name| {
                        object.field(name.clone(), TypeSchema::scalar(ScalarKind::Json))
                    }),
            ),
            _ => return Err(Error::mismatch(path, "object", value)),
        };
        Ok((object, fields))
    }

    fn form_urlencoded(
        &self,
        spec: &RequestBodySpec,
        value: &Value,
        path: &FieldPath<'_>,
    ) -> Result<String> {
        let encoder = Encoder::new(self.registry);
        let (object, fields) = self.body_fields(&spec.schema, value, path)?;

        let mut segments = Vec::new();
        for (name, field_schema) in &object.fields {
            let directive = field_directive(spec, name);
            let items = encoder.encode(field_schema, fields.get(name), &path.field(name))?;
            let entries = query_entries(name, &directive, &items);
            if entries.is_empty() {
                continue;
            }
            if directive.allow_reserved {
                segments.extend(entries.iter().map(|(key, value)| {
                    format!("{}={}", escape_query(key, true), escape_query(value, true))
                }));
            } else {
                segments.push(serde_urlencoded::to_string(&entries)?);
            }
        }
        Ok(segments.join("&"))
    }

    fn multipart(
        &self,
        spec: &RequestBodySpec,
        value: &Value,
        arguments: &Map<String, Value>,
        path: &FieldPath<'_>,
    ) -> Result<Form> {
        let encoder = Encoder::new(self.registry);
        let (object, fields) = self.body_fields(&spec.schema, value, path)?;
        let mut form = self
            .boundary
            .as_ref()
            .map_or_else(Form::new, Form::with_boundary);

        for (name, field_schema) in &object.fields {
            let field_path = path.field(name);
            let Some(field_value) = fields.get(name).filter(|value| !value.is_null()) else {
                if field_schema.is_nullable() {
                    continue;
                }
                return Err(Error::required(field_path));
            };
            let directive = field_directive(spec, name);
            let headers = self.part_headers(&directive, arguments)?;
            let parts = self.field_parts(
                &encoder,
                name,
                field_schema,
                field_value,
                &directive,
                &field_path,
            )?;
            for part in parts {
                let part = headers
                    .iter()
                    .fold(part, |part, (name, value)| part.with_header(name, value));
                form.push(part);
            }
        }
        Ok(form)
    }

    fn field_parts(
        &self,
        encoder: &Encoder<'_>,
        name: &str,
        schema: &TypeSchema,
        value: &Value,
        directive: &EncodingDirective,
        path: &FieldPath<'_>,
    ) -> Result<Vec<Part>> {
        let schema = SchemaRegistry::unwrap_nullable(schema);
        if self.registry.is_binary(schema) {
            return Ok(vec![file_part(name, value, directive, path)?]);
        }

        let resolved = self.registry.resolve(schema);
        if let Resolved::Array(items) = resolved
            && self.registry.is_binary(items)
        {
            let Value::Array(elements) = value else {
                return Err(Error::mismatch(path, "array", value));
            };
            return elements
                .iter()
                .enumerate()
                .map(|(index, element)| file_part(name, element, directive, &path.index(index)))
                .collect();
        }

        let structured = match resolved {
            Resolved::Object(_) | Resolved::Array(_) => true,
            Resolved::Scalar(ScalarKind::Json) => value.is_object() || value.is_array(),
            Resolved::Scalar(_) | Resolved::Nullable(_) => false,
        };
        let items = encoder.encode(schema, Some(value), path)?;

        if structured && directive.style != Style::DeepObject && directive.accepts_json() {
            let content_type = directive.primary_content_type().unwrap_or(JSON);
            let data = serde_json::to_vec(value)?;
            return Ok(vec![Part::new(name, data).with_content_type(content_type)]);
        }

        let content_type = directive.primary_content_type();
        let parts = if structured {
            query_entries(name, directive, &items)
                .into_iter()
                .map(|(key, value)| Part::new(key, value))
                .collect()
        } else {
            let value = items
                .find_default()
                .map(|item| item.values().join(","))
                .unwrap_or_default();
            vec![Part::new(name, value)]
        };
        Ok(parts
            .into_iter()
            .map(|part| match content_type {
                Some(content_type) => part.with_content_type(content_type),
                None => part,
            })
            .collect())
    }

    /// Part headers whose values are taken from the argument map.
    ///
    /// Names and values must be valid header text.
    fn part_headers(
        &self,
        directive: &EncodingDirective,
        arguments: &Map<String, Value>,
    ) -> Result<Vec<(String, String)>> {
        let encoder = Encoder::new(self.registry);
        let mut headers = Vec::new();
        for (name, header) in &directive.headers {
            let path = FieldPath::root(&header.argument_name);
            let value = arguments.get(&header.argument_name);
            let items = encoder.encode(&header.schema, value, &path)?;
            if let Some(value) = header_value(header.explode, &items) {
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|err| Error::invalid_header(name.as_str(), err))?;
                HeaderValue::from_str(&value)
                    .map_err(|err| Error::invalid_header(name.as_str(), err))?;
                headers.push((name.clone(), value));
            }
        }
        Ok(headers)
    }
}

fn field_directive<'a>(spec: &'a RequestBodySpec, name: &str) -> Cow<'a, EncodingDirective> {
    spec.encoding.get(name).map_or_else(
        || Cow::Owned(EncodingDirective::new(name, Location::FormField)),
        Cow::Borrowed,
    )
}

fn file_part(
    name: &str,
    value: &Value,
    directive: &EncodingDirective,
    path: &FieldPath<'_>,
) -> Result<Part> {
    let binary = decode_binary(value, path)?;
    let content_type = directive
        .primary_content_type()
        .map(ToString::to_string)
        .or(binary.media_type)
        .unwrap_or_else(|| OCTET_STREAM.to_string());
    Ok(Part::file(name, name, binary.data).with_content_type(content_type))
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use indexmap::IndexMap;
    use insta::assert_snapshot;
    use serde_json::json;

    use super::*;
    use crate::directive::HeaderDirective;

    fn string() -> TypeSchema {
        TypeSchema::scalar(ScalarKind::String)
    }

    fn spec(content_type: &str, schema: TypeSchema) -> RequestBodySpec {
        RequestBodySpec {
            argument_name: "body".to_string(),
            content_type: content_type.to_string(),
            schema,
            encoding: IndexMap::new(),
        }
    }

    fn pet_schema() -> TypeSchema {
        TypeSchema::object(
            ObjectSchema::new()
                .field("name", string())
                .field("tags", TypeSchema::nullable(TypeSchema::array(string())))
                .field("note", TypeSchema::nullable(string())),
        )
    }

    fn raw(payload: Option<Payload>) -> (String, String) {
        let_assert!(Some(Payload::Raw { content_type, data }) = payload);
        (content_type, String::from_utf8_lossy(&data).into_owned())
    }

    #[test]
    fn content_type_matching() {
        check!(media_type("Text/Plain; charset=utf-8") == "text/plain");
        check!(is_json_content_type("application/json"));
        check!(is_json_content_type("application/merge-patch+json"));
        check!(is_json_content_type("Application/JSON; charset=utf-8"));
        check!(!is_json_content_type("text/json+plain"));
        check!(!is_json_content_type("application/xml"));
    }

    #[test]
    fn json_body() {
        let registry = SchemaRegistry::new();
        let body = json!({ "name": "Rex", "tags": ["a"] });
        let payload = BodyBuilder::new(&registry)
            .build(&spec("application/json", pet_schema()), Some(&body), &Map::new())
            .expect("build");

        let (content_type, data) = raw(payload);
        check!(content_type == "application/json");
        check!(data == r#"{"name":"Rex","tags":["a"]}"#);
    }

    #[test]
    fn json_body_checks_required_fields() {
        let registry = SchemaRegistry::new();
        let body = json!({ "tags": ["a"] });
        let result = BodyBuilder::new(&registry).build(
            &spec("application/json", pet_schema()),
            Some(&body),
            &Map::new(),
        );
        let_assert!(Err(Error::RequiredValueMissing { path }) = result);
        check!(path == "body.name");
    }

    #[test]
    fn required_body_missing() {
        let registry = SchemaRegistry::new();
        let builder = BodyBuilder::new(&registry);

        let result = builder.build(&spec("application/json", pet_schema()), None, &Map::new());
        let_assert!(Err(Error::RequiredBodyMissing { path }) = result);
        check!(path == "body");

        let optional = spec("application/json", TypeSchema::nullable(pet_schema()));
        let payload = builder
            .build(&optional, Some(&Value::Null), &Map::new())
            .expect("build");
        check!(payload.is_none());
    }

    #[test]
    fn unsupported_content_type() {
        let registry = SchemaRegistry::new();
        let result = BodyBuilder::new(&registry).build(
            &spec("application/xml", pet_schema()),
            Some(&json!({ "name": "Rex" })),
            &Map::new(),
        );
        let_assert!(Err(Error::UnsupportedContentType(content_type)) = result);
        check!(content_type == "application/xml");
    }

    #[test]
    fn form_urlencoded_body() {
        let registry = SchemaRegistry::new();
        let mut body_spec = spec("application/x-www-form-urlencoded", pet_schema());
        body_spec.encoding.insert(
            "tags".to_string(),
            EncodingDirective::new("tags", Location::FormField).with_explode(false),
        );
        let body = json!({ "name": "Rex & co", "tags": ["a", "b"] });

        let payload = BodyBuilder::new(&registry)
            .build(&body_spec, Some(&body), &Map::new())
            .expect("build");

        let (content_type, data) = raw(payload);
        check!(content_type == "application/x-www-form-urlencoded");
        assert_snapshot!(data, @"name=Rex+%26+co&tags=a%2Cb");
    }

    #[test]
    fn form_urlencoded_allow_reserved() {
        let registry = SchemaRegistry::new();
        let schema = TypeSchema::object(
            ObjectSchema::new()
                .field("redirect", string())
                .field("state", string()),
        );
        let mut body_spec = spec("application/x-www-form-urlencoded", schema);
        body_spec.encoding.insert(
            "redirect".to_string(),
            EncodingDirective::new("redirect", Location::FormField).with_allow_reserved(true),
        );
        let body = json!({ "redirect": "https://x.io/cb?a=1", "state": "a/b" });

        let payload = BodyBuilder::new(&registry)
            .build(&body_spec, Some(&body), &Map::new())
            .expect("build");

        let (_, data) = raw(payload);
        assert_snapshot!(data, @"redirect=https://x.io/cb?a=1&state=a%2Fb");
    }

    #[test]
    fn text_body() {
        let registry = SchemaRegistry::new();
        let builder = BodyBuilder::new(&registry);
        let text = spec("text/plain", string());

        let (content_type, data) = raw(builder
            .build(&text, Some(&json!("hello")), &Map::new())
            .expect("build"));
        check!(content_type == "text/plain");
        check!(data == "hello");

        let (_, data) = raw(builder.build(&text, Some(&json!(42)), &Map::new()).expect("build"));
        check!(data == "42");
    }

    #[test]
    fn octet_stream_body() {
        let registry = SchemaRegistry::new();
        let binary = spec("application/octet-stream", TypeSchema::scalar(ScalarKind::Binary));
        let payload = BodyBuilder::new(&registry)
            .build(&binary, Some(&json!("data:text/plain;base64,aGVsbG8=")), &Map::new())
            .expect("build");

        let (content_type, data) = raw(payload);
        check!(content_type == "application/octet-stream");
        check!(data == "hello");
    }

    #[test]
    fn decodes_binary_arguments() {
        let path = FieldPath::root("file");

        let data_uri =
            decode_binary(&json!("data:image/png;base64,iVBORw=="), &path).expect("decode");
        check!(data_uri.media_type.as_deref() == Some("image/png"));
        check!(data_uri.data.as_ref() == [0x89, 0x50, 0x4E, 0x47]);

        let plain = decode_binary(&json!("data:,a%20b"), &path).expect("decode");
        check!(plain.media_type.is_none());
        check!(plain.data.as_ref() == b"a b");

        let bare = decode_binary(&json!("aGVsbG8="), &path).expect("decode");
        check!(bare.data.as_ref() == b"hello");

        let file = FieldPath::root("file");
        let_assert!(
            Err(Error::BodyEncoding { path, .. }) = decode_binary(&json!("not base64!"), &file)
        );
        check!(path == "file");
        let_assert!(Err(Error::SchemaMismatch { .. }) = decode_binary(&json!(1), &file));
    }

    #[test]
    fn multipart_parts() {
        let registry = SchemaRegistry::new().with_object(
            "Address",
            ObjectSchema::new()
                .field("city", string())
                .field("zip", TypeSchema::nullable(string())),
        );
        let schema = TypeSchema::object(
            ObjectSchema::new()
                .field("name", string())
                .field("tags", TypeSchema::array(string()))
                .field("ids", TypeSchema::array(TypeSchema::scalar(ScalarKind::Integer)))
                .field("address", TypeSchema::named("Address"))
                .field("file", TypeSchema::scalar(ScalarKind::Binary)),
        );
        let mut body_spec = spec("multipart/form-data", schema);
        body_spec.encoding.insert(
            "ids".to_string(),
            EncodingDirective::new("ids", Location::FormField)
                .with_style(Style::DeepObject)
                .with_explode(true),
        );
        body_spec.encoding.insert(
            "file".to_string(),
            EncodingDirective::new("file", Location::FormField).with_header(
                "X-Rate-Limit",
                HeaderDirective::new("rateLimit", TypeSchema::scalar(ScalarKind::Integer)),
            ),
        );
        let body = json!({
            "name": "Rex",
            "tags": ["a", "b"],
            "ids": [1, 2],
            "address": { "city": "Lyon" },
            "file": "data:image/png;base64,iVBORw=="
        });
        let mut arguments = Map::new();
        arguments.insert("rateLimit".to_string(), json!(10));

        let payload = BodyBuilder::new(&registry)
            .with_boundary(Some("b0".to_string()))
            .build(&body_spec, Some(&body), &arguments)
            .expect("build");

        let_assert!(Some(Payload::Multipart(form)) = payload);
        let names: Vec<_> = form.parts().iter().map(Part::name).collect();
        check!(names == ["name", "tags", "ids[]", "ids[]", "address", "file"]);

        let_assert!([_, tags, first_id, second_id, address, file] = form.parts());
        check!(tags.data().as_ref() == br#"["a","b"]"#);
        check!(tags.content_type() == Some("application/json"));
        check!(first_id.data().as_ref() == b"1");
        check!(second_id.data().as_ref() == b"2");
        check!(address.data().as_ref() == br#"{"city":"Lyon"}"#);
        check!(file.filename() == Some("file"));
        check!(file.content_type() == Some("image/png"));
        check!(file.data().as_ref() == [0x89, 0x50, 0x4E, 0x47]);
        check!(file.headers() == [("X-Rate-Limit".to_string(), "10".to_string())]);
    }

    #[test]
    fn multipart_rejects_line_breaks_in_part_headers() {
        let registry = SchemaRegistry::new();
        let schema = TypeSchema::object(
            ObjectSchema::new().field("file", TypeSchema::scalar(ScalarKind::Binary)),
        );
        let mut body_spec = spec("multipart/form-data", schema);
        body_spec.encoding.insert(
            "file".to_string(),
            EncodingDirective::new("file", Location::FormField)
                .with_header("X-Checksum", HeaderDirective::new("checksum", string())),
        );
        let forged = "abc\r\n\r\n--b0\r\nContent-Disposition: form-data; name=\"admin\"\r\n\r\ntrue";
        let mut arguments = Map::new();
        arguments.insert("checksum".to_string(), json!(forged));

        let result = BodyBuilder::new(&registry)
            .with_boundary(Some("b0".to_string()))
            .build(&body_spec, Some(&json!({ "file": "aGVsbG8=" })), &arguments);

        let_assert!(Err(Error::InvalidHeader { name, .. }) = result);
        check!(name == "X-Checksum");
    }

    #[test]
    fn multipart_decomposes_when_json_is_excluded() {
        let registry = SchemaRegistry::new();
        let schema = TypeSchema::object(ObjectSchema::new().field(
            "filter",
            TypeSchema::object(ObjectSchema::new().field("role", string())),
        ));
        let mut body_spec = spec("multipart/form-data", schema);
        body_spec.encoding.insert(
            "filter".to_string(),
            EncodingDirective::new("filter", Location::FormField).with_content_type("text/plain"),
        );

        let payload = BodyBuilder::new(&registry)
            .build(&body_spec, Some(&json!({ "filter": { "role": "admin" } })), &Map::new())
            .expect("build");

        let_assert!(Some(Payload::Multipart(form)) = payload);
        let_assert!([part] = form.parts());
        check!(part.name() == "role");
        check!(part.data().as_ref() == b"admin");
        check!(part.content_type() == Some("text/plain"));
    }

    #[test]
    fn multipart_required_field() {
        let registry = SchemaRegistry::new();
        let result = BodyBuilder::new(&registry).build(
            &spec("multipart/form-data", pet_schema()),
            Some(&json!({ "tags": ["a"] })),
            &Map::new(),
        );
        let_assert!(Err(Error::RequiredValueMissing { path }) = result);
        check!(path == "body.name");
    }

    #[test]
    fn from_json_reports_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct User {
            #[allow(dead_code)]
            address: Address,
        }

        let result: Result<User> = from_json(br#"{"address":{"city":1}}"#);
        let_assert!(Err(Error::JsonDeserialization { path, .. }) = result);
        check!(path == "address.city");
    }
}
