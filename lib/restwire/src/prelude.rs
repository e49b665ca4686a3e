//! Prelude module for convenient imports.
//!
//! ```
//! use restwire::prelude::*;
//! ```

pub use crate::{
    ClientConfig, EncodingDirective, Error, Executor, HyperClient, Location, Method, Operation,
    Parameter, RequestAssembler, RequestBodySpec, RequestDescriptor, Response, Result,
    RetryPolicy, ScalarKind, SchemaRegistry, Settings, Style, TypeSchema,
};
pub use restwire_core::{Credential, SecurityRequirement, SecurityScheme};
