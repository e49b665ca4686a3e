//! Operation execution.

use std::fmt;

use restwire_core::{Error, Operation, RequestAssembler, RequestDescriptor, Result};
use serde_json::{Map, Value};
use tower::retry::{Retry, RetryLayer};
use tower::{Service, ServiceBuilder, ServiceExt};
use tracing::{Instrument, debug, info_span, warn};

use crate::client::HyperClient;
use crate::middleware::{Logging, LoggingLayer, RetryOnFailure};
use crate::response::Response;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Runs operations against one server.
///
/// Each call assembles the request once, then sends it through the retry and
/// logging layers. Non-2xx responses become [`Error::Http`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use restwire::Executor;
/// use restwire_core::{Method, Operation, RequestAssembler, SchemaRegistry, Settings};
/// use serde_json::Map;
///
/// # async fn run() -> restwire_core::Result<()> {
/// let settings = Settings::builder().base_url("https://api.example.com").build();
/// let executor = Executor::new(RequestAssembler::new(Arc::new(SchemaRegistry::new()), settings));
///
/// let pets = executor
///     .execute(&Operation::new("listPets", Method::Get, "/pets"), &Map::new())
///     .await?;
/// # let _ = pets;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Executor<S = HyperClient> {
    assembler: RequestAssembler,
    service: Retry<RetryOnFailure, Logging<S>>,
}

impl<S> fmt::Debug for Executor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}

impl Executor<HyperClient> {
    /// Create an executor sending requests with a default [`HyperClient`].
    #[must_use]
    pub fn new(assembler: RequestAssembler) -> Self {
        Self::with_client(assembler, HyperClient::new())
    }
}

impl<S> Executor<S>
where
    S: Service<RequestDescriptor, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    /// Create an executor sending requests through `client`.
    pub fn with_client(assembler: RequestAssembler, client: S) -> Self {
        let service = ServiceBuilder::new()
            .layer(RetryLayer::new(RetryOnFailure::new()))
            .layer(LoggingLayer::new())
            .service(client);

        Self { assembler, service }
    }

    /// The assembler building the requests.
    pub const fn assembler(&self) -> &RequestAssembler {
        &self.assembler
    }

    /// Send an assembled request, retrying as its policy allows.
    ///
    /// The last response is returned whatever its status.
    ///
    /// # Errors
    ///
    /// Returns the transport error of the last attempt.
    pub async fn send(&self, request: RequestDescriptor) -> Result<Response> {
        self.service.clone().oneshot(request).await
    }

    /// Assemble and send an operation, returning the successful response.
    ///
    /// # Errors
    ///
    /// - any assembly error, before anything is sent
    /// - [`Error::Http`] for a non-2xx final response
    /// - transport errors of the last attempt
    pub async fn execute_raw(
        &self,
        operation: &Operation,
        arguments: &Map<String, Value>,
    ) -> Result<Response> {
        let span = info_span!("execute", operation = %operation.name);

        async {
            let request = self.assembler.assemble(operation, arguments)?;
            let response = self.send(request).await?;
            debug!(status = response.status().as_u16(), "response received");

            response.error_for_status().inspect_err(|error| {
                if let Some(body) = error.body() {
                    warn!(error = %error, body = %body_preview(body), "operation failed");
                }
            })
        }
        .instrument(span)
        .await
    }

    /// Assemble and send an operation, decoding the response body.
    ///
    /// See [`Response::decode`] for the decoding rules.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::execute_raw`], plus decoding errors of JSON bodies.
    pub async fn execute(
        &self,
        operation: &Operation,
        arguments: &Map<String, Value>,
    ) -> Result<Value> {
        self.execute_raw(operation, arguments).await?.decode()
    }
}

/// Start of a body for logs.
fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((end, _)) => format!("{}...", text.get(..end).unwrap_or_default()),
        None => text.into_owned(),
    }
}
