//! Ready-to-send request description.

use std::time::Duration;

use bytes::Bytes;
use http::HeaderMap;
use url::Url;

use crate::body::Payload;
use crate::format::QueryString;
use crate::method::Method;
use crate::settings::RetryPolicy;

/// A fully assembled request.
///
/// Built once per invocation. Retries re-send the same descriptor, so the
/// encoded query and body never change between attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    query: QueryString,
    headers: HeaderMap,
    body: Option<Payload>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl RequestDescriptor {
    /// Create a descriptor for a URL without query string.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: QueryString::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: crate::settings::DEFAULT_TIMEOUT,
            retry: RetryPolicy::standard(),
        }
    }

    /// Set the query string.
    #[must_use]
    pub fn with_query(mut self, query: QueryString) -> Self {
        self.query = query;
        self
    }

    /// Set the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: Option<Payload>) -> Self {
        self.body = body;
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Base URL joined with the substituted path, without query string.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Encoded query string.
    #[must_use]
    pub fn query(&self) -> &QueryString {
        &self.query
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Request body.
    #[must_use]
    pub fn body(&self) -> Option<&Payload> {
        self.body.as_ref()
    }

    /// Body bytes, empty when there is no body.
    #[must_use]
    pub fn body_bytes(&self) -> Bytes {
        self.body.as_ref().map(Payload::to_bytes).unwrap_or_default()
    }

    /// Timeout of one attempt.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy.
    #[must_use]
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// URL with the query string.
    ///
    /// Characters that cannot appear in a URL query (e.g. `#` sent with
    /// `allowReserved`) are percent-encoded by the URL parser.
    #[must_use]
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.set_query(Some(self.query.as_str()));
        }
        url
    }
}
