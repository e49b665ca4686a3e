//! Type schemas describing the shape of argument values.
//!
//! A [`TypeSchema`] tree is produced by the schema translation step and is
//! read-only afterwards. Named references ([`TypeSchema::Named`]) are resolved
//! through a frozen [`SchemaRegistry`], which is also how recursive types are
//! expressed.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

/// Representation kind of a scalar value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScalarKind {
    /// `true` / `false`.
    Boolean,
    /// Signed decimal integer.
    Integer,
    /// Floating point number.
    Float,
    /// Free-form string.
    String,
    /// ISO 8601 date.
    Date,
    /// ISO 8601 date-time.
    DateTime,
    /// UUID string.
    Uuid,
    /// Base64-encoded bytes.
    Bytes,
    /// Binary content (data URI or base64 string).
    Binary,
    /// String restricted to a set of values.
    Enum {
        /// Allowed values.
        allowed: Vec<String>,
    },
    /// Arbitrary JSON, serialized opaquely.
    Json,
    /// Unix timestamp in seconds.
    UnixTime,
}

impl ScalarKind {
    /// Short name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Uuid => "uuid",
            Self::Bytes => "bytes",
            Self::Binary => "binary",
            Self::Enum { .. } => "enum",
            Self::Json => "json",
            Self::UnixTime => "unix-time",
        }
    }
}

/// Object type with fields in declaration order.
///
/// A field is optional exactly when its schema is [`TypeSchema::Nullable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObjectSchema {
    /// Fields, in declaration order.
    pub fields: IndexMap<String, TypeSchema>,
}

impl ObjectSchema {
    /// Create an empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: TypeSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Schema of a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeSchema> {
        self.fields.get(name)
    }
}

/// Shape of a value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSchema {
    /// Leaf value.
    Scalar {
        /// Representation kind.
        scalar: ScalarKind,
    },
    /// Object with named fields.
    Object {
        /// The object type.
        #[serde(flatten)]
        object: ObjectSchema,
    },
    /// Array of items.
    Array {
        /// Item schema.
        items: Box<TypeSchema>,
    },
    /// Value that may be absent.
    Nullable {
        /// Underlying schema.
        underlying: Box<TypeSchema>,
    },
    /// Reference to a registered scalar or object type.
    Named {
        /// Registered type name.
        name: String,
    },
}

impl TypeSchema {
    /// Scalar schema.
    #[must_use]
    pub const fn scalar(scalar: ScalarKind) -> Self {
        Self::Scalar { scalar }
    }

    /// Object schema.
    #[must_use]
    pub const fn object(object: ObjectSchema) -> Self {
        Self::Object { object }
    }

    /// Array schema.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Nullable wrapper.
    #[must_use]
    pub fn nullable(underlying: Self) -> Self {
        Self::Nullable {
            underlying: Box::new(underlying),
        }
    }

    /// Named reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    /// Returns `true` if the outermost schema is nullable.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable { .. })
    }
}

/// Schema after resolving nullability and named references.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Leaf value.
    Scalar(&'a ScalarKind),
    /// Object value.
    Object(&'a ObjectSchema),
    /// Array with item schema.
    Array(&'a TypeSchema),
    /// Nullable wrapper around the underlying schema.
    Nullable(&'a TypeSchema),
}

static JSON_SCALAR: ScalarKind = ScalarKind::Json;

/// Frozen registry of named scalar and object types.
///
/// Built once when the schema is loaded, then shared read-only across
/// concurrent requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaRegistry {
    #[serde(default)]
    scalars: HashMap<String, ScalarKind>,
    #[serde(default)]
    objects: HashMap<String, ObjectSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named scalar.
    #[must_use]
    pub fn with_scalar(mut self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.scalars.insert(name.into(), kind);
        self
    }

    /// Register a named object.
    #[must_use]
    pub fn with_object(mut self, name: impl Into<String>, object: ObjectSchema) -> Self {
        self.objects.insert(name.into(), object);
        self
    }

    /// Named scalar lookup.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&ScalarKind> {
        self.scalars.get(name)
    }

    /// Named object lookup.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&ObjectSchema> {
        self.objects.get(name)
    }

    /// Resolve named references of the outermost schema.
    ///
    /// An unknown name resolves to the JSON scalar so the value is serialized
    /// opaquely.
    #[must_use]
    pub fn resolve<'a>(&'a self, schema: &'a TypeSchema) -> Resolved<'a> {
        match schema {
            TypeSchema::Scalar { scalar } => Resolved::Scalar(scalar),
            TypeSchema::Object { object } => Resolved::Object(object),
            TypeSchema::Array { items } => Resolved::Array(items),
            TypeSchema::Nullable { underlying } => Resolved::Nullable(underlying),
            TypeSchema::Named { name } => self
                .scalar(name)
                .map(Resolved::Scalar)
                .or_else(|| self.object(name).map(Resolved::Object))
                .unwrap_or(Resolved::Scalar(&JSON_SCALAR)),
        }
    }

    /// Strip every nullable wrapper, returning the innermost schema.
    #[must_use]
    pub fn unwrap_nullable(schema: &TypeSchema) -> &TypeSchema {
        let mut current = schema;
        while let TypeSchema::Nullable { underlying } = current {
            current = underlying;
        }
        current
    }

    /// Returns `true` if the schema resolves to a binary scalar.
    #[must_use]
    pub fn is_binary(&self, schema: &TypeSchema) -> bool {
        matches!(
            self.resolve(Self::unwrap_nullable(schema)),
            Resolved::Scalar(ScalarKind::Binary)
        )
    }
}
