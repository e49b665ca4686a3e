//! Execute `OpenAPI`-described REST operations.
//!
//! [`restwire_core`] turns an [`Operation`] and its arguments into a
//! [`RequestDescriptor`]; this crate sends it:
//! - [`HyperClient`] - hyper-util client over rustls, honouring the request timeout
//! - [`middleware`] - tower layers for retries and `tracing` logs
//! - [`Executor`] - assemble, send, check the status and decode the body
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use restwire::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> restwire::Result<()> {
//! let operation = Operation::new("getPet", Method::Get, "/pets/{petId}").parameter(Parameter::new(
//!     TypeSchema::scalar(ScalarKind::Integer),
//!     EncodingDirective::new("petId", Location::Path),
//! ));
//! let settings = Settings::builder()
//!     .base_url("https://petstore.example.com/v1")
//!     .retry(RetryPolicy::standard().with_times(2))
//!     .build();
//! let executor = Executor::new(RequestAssembler::new(Arc::new(SchemaRegistry::new()), settings));
//!
//! let arguments = json!({ "petId": 42 });
//! if let Some(arguments) = arguments.as_object() {
//!     let pet = executor.execute(&operation, arguments).await?;
//!     println!("{pet}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
mod executor;
pub mod middleware;
pub mod prelude;
mod response;

pub use client::{HyperClient, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use connector::https_connector;
pub use executor::Executor;
pub use response::Response;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use restwire_core::{
    EncodingDirective, Error, Location, Method, Operation, Parameter, RequestAssembler,
    RequestBodySpec, RequestDescriptor, Result, RetryPolicy, ScalarKind, SchemaRegistry, Settings,
    Style, TypeSchema,
};

// Re-export http types for status codes and headers
pub use restwire_core::{StatusCode, header};
