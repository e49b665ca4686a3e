//! Core of restwire: `OpenAPI` parameter serialization and request assembly.
//!
//! This crate turns typed argument values into the exact wire form an
//! `OpenAPI` description mandates:
//! - [`TypeSchema`] and [`SchemaRegistry`] - shape of argument values
//! - [`EncodingDirective`] - location, style, explode and allow-reserved flags
//! - [`Encoder`] - flattens values into [`ParameterItems`]
//! - [`query_entries`], [`header_value`], [`substitute_path`] - style rules
//! - [`BodyBuilder`] - JSON, form, multipart, text and binary bodies
//! - [`RequestAssembler`] - builds a [`RequestDescriptor`] for an [`Operation`]
//! - [`Error`] and [`Result`] - error handling
//!
//! Everything here is synchronous and free of I/O; sending the request is the
//! job of the `restwire` crate.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use restwire_core::{
//!     EncodingDirective, Location, Method, Operation, Parameter, RequestAssembler, ScalarKind,
//!     SchemaRegistry, Settings, Style, TypeSchema,
//! };
//! use serde_json::json;
//!
//! let operation = Operation::new("findPets", Method::Get, "/pets").parameter(Parameter::new(
//!     TypeSchema::array(TypeSchema::scalar(ScalarKind::Integer)),
//!     EncodingDirective::new("id", Location::Query)
//!         .with_style(Style::PipeDelimited)
//!         .with_explode(false),
//! ));
//! let settings = Settings::builder().base_url("https://api.example.com").build();
//! let assembler = RequestAssembler::new(Arc::new(SchemaRegistry::new()), settings);
//!
//! let arguments = json!({ "id": [3, 4, 5] });
//! let request = assembler
//!     .assemble(&operation, arguments.as_object().expect("object"))
//!     .expect("assemble");
//! assert_eq!(request.full_url().as_str(), "https://api.example.com/pets?id=3%7C4%7C5");
//! ```

mod assemble;
mod body;
mod directive;
mod encoder;
mod error;
mod format;
mod method;
mod multipart;
mod operation;
mod param;
pub mod prelude;
mod request;
mod schema;
mod security;
mod settings;

pub use assemble::RequestAssembler;
pub use body::{
    BinaryData, BodyBuilder, Payload, decode_binary, from_json, is_json_content_type, media_type,
};
pub use directive::{EncodingDirective, HeaderDirective, Location, Style};
pub use encoder::{Encoder, encode_scalar, format_float};
pub use error::{Error, Result};
pub use format::{
    QueryString, cookie_pairs, escape_query, format_key, header_value, query_entries,
    substitute_path,
};
pub use method::Method;
pub use multipart::{Form, Part};
pub use operation::{Operation, Parameter, RequestBodySpec};
pub use param::{FieldPath, Key, ParameterItem, ParameterItems};
pub use request::RequestDescriptor;
pub use schema::{ObjectSchema, Resolved, ScalarKind, SchemaRegistry, TypeSchema};
pub use security::{
    ApiKeyLocation, Credential, HttpAuthScheme, Injection, SecurityRequirement, SecurityScheme,
    resolve_injection,
};
pub use settings::{
    DEFAULT_RETRY_DELAY, DEFAULT_RETRY_STATUS, DEFAULT_TIMEOUT, GlobalDefaults, RetryPolicy,
    Settings, SettingsBuilder,
};

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};
