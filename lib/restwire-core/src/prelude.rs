//! Prelude module for convenient imports.
//!
//! ```
//! use restwire_core::prelude::*;
//! ```

pub use crate::{
    Credential, EncodingDirective, Error, Location, Method, ObjectSchema, Operation, Parameter,
    RequestAssembler, RequestBodySpec, RequestDescriptor, Result, RetryPolicy, ScalarKind,
    SchemaRegistry, SecurityRequirement, SecurityScheme, Settings, Style, TypeSchema,
};
