//! HTTP client implementation using hyper-util.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use restwire_core::{Error, RequestDescriptor, Result};
use tower_service::Service;

use crate::config::ClientConfig;
use crate::connector::https_connector;
use crate::response::Response;

/// Future type for the [`Service`] implementations of this crate.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// HTTP client using hyper-util with connection pooling and TLS.
///
/// Sends one [`RequestDescriptor`] per call and applies its timeout to the
/// whole exchange, body included. Retrying is left to the outer layers.
///
/// # Example
///
/// ```no_run
/// use restwire::HyperClient;
/// use restwire::tower::ServiceExt;
/// use restwire_core::{Method, RequestDescriptor};
///
/// # async fn run() -> restwire_core::Result<()> {
/// let url = url::Url::parse("https://api.example.com/pets").expect("url");
/// let response = HyperClient::new()
///     .oneshot(RequestDescriptor::new(Method::Get, url))
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Create a new client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(&config));

        Self { inner, config }
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and read the whole response.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] when the descriptor timeout elapses
    /// - [`Error::Connection`] or [`Error::Tls`] when the exchange fails
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Response> {
        let hyper_request = build_hyper_request(request)?;

        tokio::time::timeout(request.timeout(), self.exchange(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
    }

    async fn exchange(&self, request: http::Request<Full<Bytes>>) -> Result<Response> {
        let response = self
            .inner
            .request(request)
            .await
            .map_err(map_hyper_error)?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(parts.status, parts.headers, body))
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<RequestDescriptor> for HyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RequestDescriptor) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(&request).await })
    }
}

/// Build a hyper request from a descriptor.
fn build_hyper_request(request: &RequestDescriptor) -> Result<http::Request<Full<Bytes>>> {
    let url = request.full_url();
    let uri = url
        .as_str()
        .parse::<http::Uri>()
        .map_err(|e| Error::connection(format!("invalid URI {url}: {e}")))?;

    let mut hyper_request = http::Request::new(Full::new(request.body_bytes()));
    *hyper_request.method_mut() = http::Method::from(request.method());
    *hyper_request.uri_mut() = uri;
    *hyper_request.headers_mut() = request.headers().clone();

    Ok(hyper_request)
}

#[allow(clippy::needless_pass_by_value)]
fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
    let msg = err.to_string();
    let detail = std::error::Error::source(&err).map_or_else(String::new, ToString::to_string);
    let lowered = format!("{msg} {detail}").to_lowercase();

    if lowered.contains("ssl") || lowered.contains("tls") || lowered.contains("certificate") {
        return Error::tls(msg);
    }

    if detail.is_empty() {
        Error::connection(msg)
    } else {
        Error::connection(format!("{msg}: {detail}"))
    }
}
