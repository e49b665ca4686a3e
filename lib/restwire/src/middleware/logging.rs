//! Attempt logging middleware.
//!
//! Logs every attempt sent through the wrapped service using the `tracing`
//! crate. Placed inside the retry layer, it records one span per attempt.

use std::task::{Context, Poll};
use std::time::Instant;

use restwire_core::{Error, RequestDescriptor, Result};
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::client::ServiceFuture;
use crate::response::Response;

/// Layer that adds attempt logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level of the "sending request" event.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogLevel {
    /// Log at debug level, with request headers.
    #[default]
    Debug,
    /// Log at info level, summary only.
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that announces requests at info level.
    #[must_use]
    pub fn info() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<RequestDescriptor> for Logging<S>
where
    S: Service<RequestDescriptor, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: RequestDescriptor) -> Self::Future {
        let method = request.method();
        let url = request.full_url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        // `poll_ready` was called on `self.inner`; keep that instance.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        let timeout_ms =
                            u64::try_from(request.timeout().as_millis()).unwrap_or(u64::MAX);
                        debug!(headers = ?request.headers(), timeout_ms, "sending request");
                    }
                    LogLevel::Info => {
                        info!("sending request");
                    }
                }

                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status().as_u16();
                        if response.is_success() {
                            info!(status, elapsed_ms, "request completed");
                        } else {
                            warn!(status, elapsed_ms, "request failed with HTTP error");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
