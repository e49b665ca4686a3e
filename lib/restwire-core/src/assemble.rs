//! Request assembly.
//!
//! Turns an [`Operation`] and its argument values into a
//! [`RequestDescriptor`]:
//!
//! 1. substitute path parameters
//! 2. encode query parameters
//! 3. set static headers, then header and cookie parameters
//! 4. build the body
//! 5. inject the security credential
//! 6. resolve timeout and retry policy

use std::sync::Arc;

use http::header::{CONTENT_TYPE, COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tracing::{debug, trace};
use url::Url;

use crate::body::BodyBuilder;
use crate::directive::Location;
use crate::encoder::Encoder;
use crate::format::{QueryString, cookie_pairs, header_value, query_entries, substitute_path};
use crate::operation::Operation;
use crate::param::FieldPath;
use crate::request::RequestDescriptor;
use crate::schema::SchemaRegistry;
use crate::security::{Injection, resolve_injection};
use crate::settings::Settings;
use crate::{Error, Result};

/// Assembles requests for one server.
///
/// Holds only read-only state, so a single assembler can serve concurrent
/// invocations.
#[derive(Debug, Clone)]
pub struct RequestAssembler {
    registry: Arc<SchemaRegistry>,
    settings: Settings,
    boundary: Option<String>,
}

impl RequestAssembler {
    /// Create an assembler.
    #[must_use]
    pub const fn new(registry: Arc<SchemaRegistry>, settings: Settings) -> Self {
        Self {
            registry,
            settings,
            boundary: None,
        }
    }

    /// Use a fixed multipart boundary instead of a time-derived one.
    #[must_use]
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Server settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Schema registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Assemble the request of an operation.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid argument, unsupported location or content
    /// type, invalid header or invalid URL. No partial request is returned.
    pub fn assemble(
        &self,
        operation: &Operation,
        arguments: &Map<String, Value>,
    ) -> Result<RequestDescriptor> {
        let encoder = Encoder::new(&self.registry);
        let mut path = operation.path.clone();
        let mut query = QueryString::new();
        let mut headers = HeaderMap::new();
        let mut cookies = Vec::new();

        for (name, value) in &self.settings.headers {
            insert_header(&mut headers, name, value)?;
        }

        for parameter in &operation.parameters {
            let directive = &parameter.directive;
            let argument = FieldPath::root(&parameter.argument_name);
            let items = encoder.encode(
                &parameter.schema,
                arguments.get(&parameter.argument_name),
                &argument,
            )?;

            match directive.location {
                Location::Path => {
                    if items.is_empty() {
                        return Err(Error::required(&parameter.argument_name));
                    }
                    path = substitute_path(&path, &directive.name, &items)?;
                }
                Location::Query => {
                    query.extend(
                        query_entries(&directive.name, directive, &items),
                        directive.allow_reserved,
                    );
                }
                Location::Header => {
                    // Headers use the `simple` style: not exploded unless set.
                    let explode = directive.explode.unwrap_or(false);
                    if let Some(value) = header_value(explode, &items) {
                        insert_header(&mut headers, &directive.name, &value)?;
                    }
                }
                Location::Cookie => {
                    cookies.extend(cookie_pairs(&directive.name, directive, &items));
                }
                Location::FormField => {
                    return Err(Error::UnsupportedLocation {
                        path: parameter.argument_name.clone(),
                        location: directive.location,
                    });
                }
            }
        }

        let body = match &operation.request_body {
            Some(spec) => BodyBuilder::new(&self.registry)
                .with_boundary(self.boundary.clone())
                .build(spec, arguments.get(&spec.argument_name), arguments)?,
            None => None,
        };
        if let Some(payload) = &body {
            insert_header(&mut headers, CONTENT_TYPE.as_str(), &payload.content_type())?;
        }

        let requirements = operation
            .security
            .as_deref()
            .unwrap_or(&self.settings.security);
        if let Some((scheme, injection)) = resolve_injection(
            requirements,
            &self.settings.security_schemes,
            &self.settings.credentials,
        ) {
            trace!(operation = %operation.name, scheme, "inject credential");
            match injection {
                Injection::Header { name, value } => insert_header(&mut headers, &name, &value)?,
                Injection::Query { name, value } => query.append(&name, &value, false),
                Injection::Cookie { name, value } => cookies.push(format!("{name}={value}")),
            }
        }

        if !cookies.is_empty() {
            let existing = headers
                .get(COOKIE)
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string);
            let cookie = existing.into_iter().chain(cookies).collect::<Vec<_>>().join("; ");
            insert_header(&mut headers, COOKIE.as_str(), &cookie)?;
        }

        let url = join_url(&self.settings.base_url, &path)?;
        let request = RequestDescriptor::new(operation.method, url)
            .with_query(query)
            .with_headers(headers)
            .with_body(body)
            .with_timeout(self.settings.resolve_timeout(operation.timeout))
            .with_retry(self.settings.resolve_retry(operation.retry.as_ref()));

        debug!(
            operation = %operation.name,
            method = %operation.method,
            url = %request.full_url(),
            "assembled request"
        );
        Ok(request)
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|err| Error::invalid_header(name, err))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|err| Error::invalid_header(name, err))?;
    headers.insert(header_name, header_value);
    Ok(())
}

/// Join the base URL and the substituted path.
fn join_url(base_url: &str, path: &str) -> Result<Url> {
    if base_url.is_empty() {
        return Ok(Url::parse(path)?);
    }
    let url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&url)?)
}
