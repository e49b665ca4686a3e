//! Tower middleware around [`HyperClient`](crate::HyperClient).
//!
//! - [`LoggingLayer`] logs each attempt with `tracing`
//! - [`RetryOnFailure`] is the [`RetryLayer`] policy honouring the retry
//!   settings of each request
//!
//! With [`ServiceBuilder`], the first layer added is the outermost one.
//!
//! ```
//! use restwire::HyperClient;
//! use restwire::middleware::{LoggingLayer, RetryLayer, RetryOnFailure, ServiceBuilder};
//!
//! let service = ServiceBuilder::new()
//!     .layer(RetryLayer::new(RetryOnFailure::new()))
//!     .layer(LoggingLayer::new())
//!     .service(HyperClient::new());
//! # let _ = service;
//! ```

mod logging;
mod retry;

pub use logging::{LogLevel, Logging, LoggingLayer};
pub use retry::RetryOnFailure;

pub use tower::ServiceBuilder;
pub use tower::retry::{Retry, RetryLayer};
