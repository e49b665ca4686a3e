//! Parameter value encoder.
//!
//! Walks a runtime value against its [`TypeSchema`] and flattens it into
//! [`ParameterItems`]. Object fields are visited in schema order so the output
//! does not depend on the runtime map order.

use serde_json::Value;

use crate::param::{FieldPath, Key, ParameterItems};
use crate::schema::{Resolved, ScalarKind, SchemaRegistry, TypeSchema};
use crate::{Error, Result};

/// Flattens argument values into parameter items.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'r> {
    registry: &'r SchemaRegistry,
}

/// Key path under construction, linked to its parent frame.
#[derive(Debug, Clone, Copy)]
struct KeyFrame<'a> {
    parent: Option<&'a KeyFrame<'a>>,
    key: KeyStep<'a>,
}

#[derive(Debug, Clone, Copy)]
enum KeyStep<'a> {
    Field(&'a str),
    Element,
}

fn collect_keys(frame: Option<&KeyFrame<'_>>) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut current = frame;
    while let Some(frame) = current {
        keys.push(match frame.key {
            KeyStep::Field(name) => Key::field(name),
            KeyStep::Element => Key::Element,
        });
        current = frame.parent;
    }
    keys.reverse();
    keys
}

impl<'r> Encoder<'r> {
    /// Create an encoder resolving named types through the registry.
    #[must_use]
    pub const fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Encode a value into parameter items.
    ///
    /// An absent (`None` or `null`) value yields no item when the schema is
    /// nullable and fails with [`Error::RequiredValueMissing`] otherwise.
    pub fn encode(
        &self,
        schema: &TypeSchema,
        value: Option<&Value>,
        path: &FieldPath<'_>,
    ) -> Result<ParameterItems> {
        let mut items = ParameterItems::new();
        self.encode_into(&mut items, None, schema, value, path)?;
        Ok(items)
    }

    fn encode_into(
        &self,
        items: &mut ParameterItems,
        prefix: Option<&KeyFrame<'_>>,
        schema: &TypeSchema,
        value: Option<&Value>,
        path: &FieldPath<'_>,
    ) -> Result<()> {
        let value = value.filter(|value| !value.is_null());
        let resolved = self.registry.resolve(schema);

        if let Resolved::Nullable(underlying) = resolved {
            return match value {
                Some(value) => self.encode_into(items, prefix, underlying, Some(value), path),
                None => Ok(()),
            };
        }
        let Some(value) = value else {
            return Err(Error::required(path));
        };

        match resolved {
            Resolved::Scalar(kind) => {
                let encoded = encode_scalar(kind, value, path)?;
                items.add(collect_keys(prefix), vec![encoded]);
            }
            Resolved::Array(item_schema) => {
                let Value::Array(elements) = value else {
                    return Err(Error::mismatch(path, "array", value));
                };
                let frame = KeyFrame {
                    parent: prefix,
                    key: KeyStep::Element,
                };
                for (index, element) in elements.iter().enumerate() {
                    self.encode_into(
                        items,
                        Some(&frame),
                        item_schema,
                        Some(element),
                        &path.index(index),
                    )?;
                }
            }
            Resolved::Object(object) => {
                let Value::Object(fields) = value else {
                    return Err(Error::mismatch(path, "object", value));
                };
                for (name, field_schema) in &object.fields {
                    let frame = KeyFrame {
                        parent: prefix,
                        key: KeyStep::Field(name),
                    };
                    self.encode_into(
                        items,
                        Some(&frame),
                        field_schema,
                        fields.get(name),
                        &path.field(name),
                    )?;
                }
            }
            Resolved::Nullable(_) => {}
        }
        Ok(())
    }
}

/// Canonical string form of a scalar value.
///
/// Booleans and numbers also accept their string spellings, since values
/// often arrive through string-typed channels.
pub fn encode_scalar(kind: &ScalarKind, value: &Value, path: &FieldPath<'_>) -> Result<String> {
    let mismatch = || Error::mismatch(path, kind.name(), value);
    match kind {
        ScalarKind::Boolean => match value {
            Value::Bool(flag) => Ok(flag.to_string()),
            Value::String(text) => text
                .parse::<bool>()
                .map(|flag| flag.to_string())
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ScalarKind::Integer | ScalarKind::UnixTime => match value {
            Value::Number(number) => number
                .as_i64()
                .map(|int| int.to_string())
                .or_else(|| number.as_u64().map(|int| int.to_string()))
                .ok_or_else(mismatch),
            Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(|int| int.to_string())
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ScalarKind::Float => {
            let float = match value {
                Value::Number(number) => number.as_f64(),
                Value::String(text) => text.trim().parse::<f64>().ok(),
                _ => None,
            };
            float
                .filter(|float| float.is_finite())
                .map(format_float)
                .ok_or_else(mismatch)
        }
        ScalarKind::String
        | ScalarKind::Date
        | ScalarKind::DateTime
        | ScalarKind::Uuid
        | ScalarKind::Bytes
        | ScalarKind::Binary => match value {
            Value::String(text) => Ok(text.clone()),
            _ => Err(mismatch()),
        },
        ScalarKind::Enum { allowed } => match value {
            Value::String(text) if allowed.contains(text) => Ok(text.clone()),
            Value::String(text) => Err(Error::InvalidEnumValue {
                path: path.to_string(),
                value: text.clone(),
                allowed: allowed.clone(),
            }),
            _ => Err(mismatch()),
        },
        ScalarKind::Json => match value {
            Value::String(text) => Ok(text.clone()),
            other => Ok(serde_json::to_string(other)?),
        },
    }
}

/// Shortest decimal representation that parses back to the same `f64`,
/// never in exponent notation.
#[must_use]
pub fn format_float(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;
    use crate::schema::ObjectSchema;

    fn int() -> TypeSchema {
        TypeSchema::scalar(ScalarKind::Integer)
    }

    fn string() -> TypeSchema {
        TypeSchema::scalar(ScalarKind::String)
    }

    fn encode(schema: &TypeSchema, value: &Value) -> Result<ParameterItems> {
        let registry = SchemaRegistry::new();
        Encoder::new(&registry).encode(schema, Some(value), &FieldPath::root("arg"))
    }

    fn flat(items: &ParameterItems) -> Vec<(Vec<Key>, Vec<String>)> {
        items.clone().into_iter().map(|item| item.into_parts()).collect()
    }

    #[test]
    fn scalar_yields_single_unkeyed_item() {
        let items = encode(&int(), &json!(42)).expect("encode");
        check!(flat(&items) == [(vec![], vec!["42".to_string()])]);
    }

    #[test]
    fn scalar_canonical_forms() {
        let path = FieldPath::root("v");
        let cases = [
            (ScalarKind::Boolean, json!(true), "true"),
            (ScalarKind::Boolean, json!("false"), "false"),
            (ScalarKind::Integer, json!(-17), "-17"),
            (ScalarKind::Integer, json!("007"), "7"),
            (ScalarKind::Integer, json!(u64::MAX), "18446744073709551615"),
            (ScalarKind::Float, json!(1.5), "1.5"),
            (ScalarKind::Float, json!(3.0), "3"),
            (ScalarKind::Float, json!(0.1), "0.1"),
            (ScalarKind::Float, json!(1e21), "1000000000000000000000"),
            (ScalarKind::Float, json!("2.25"), "2.25"),
            (ScalarKind::UnixTime, json!(1_700_000_000), "1700000000"),
            (ScalarKind::DateTime, json!("2024-01-01T00:00:00Z"), "2024-01-01T00:00:00Z"),
            (ScalarKind::Json, json!("bare"), "bare"),
            (ScalarKind::Json, json!({"a": [1, 2]}), r#"{"a":[1,2]}"#),
            (ScalarKind::Json, json!(12), "12"),
        ];
        for (kind, value, expected) in cases {
            let encoded = encode_scalar(&kind, &value, &path).expect("scalar");
            check!(encoded == expected, "{kind:?} {value}");
        }
    }

    #[test]
    fn scalar_round_trips() {
        let path = FieldPath::root("v");
        let float = encode_scalar(&ScalarKind::Float, &json!(123.456_789), &path).expect("f");
        check!(float.parse::<f64>().ok() == Some(123.456_789));
        let int = encode_scalar(&ScalarKind::Integer, &json!(i64::MIN), &path).expect("i");
        check!(int.parse::<i64>().ok() == Some(i64::MIN));
        let flag = encode_scalar(&ScalarKind::Boolean, &json!(false), &path).expect("b");
        check!(flag.parse::<bool>().ok() == Some(false));
    }

    #[test]
    fn scalar_kind_mismatch() {
        let path = FieldPath::root("limit");
        let result = encode_scalar(&ScalarKind::Integer, &json!(1.5), &path);
        let_assert!(Err(Error::SchemaMismatch { path, expected, actual }) = result);
        check!(path == "limit");
        check!(expected == "integer");
        check!(actual == "number");

        let result = encode_scalar(&ScalarKind::String, &json!({"a": 1}), &FieldPath::root("q"));
        let_assert!(Err(Error::SchemaMismatch { .. }) = result);
    }

    #[test]
    fn enum_membership() {
        let kind = ScalarKind::Enum {
            allowed: vec!["available".to_string(), "sold".to_string()],
        };
        let path = FieldPath::root("status");
        check!(encode_scalar(&kind, &json!("sold"), &path).ok() == Some("sold".to_string()));

        let result = encode_scalar(&kind, &json!("lost"), &path);
        let_assert!(Err(Error::InvalidEnumValue { path, value, allowed }) = result);
        check!(path == "status");
        check!(value == "lost");
        check!(allowed == ["available", "sold"]);
    }

    #[test]
    fn array_of_scalars_accumulates_under_element_key() {
        let items = encode(&TypeSchema::array(int()), &json!([3, 4, 5])).expect("encode");
        check!(
            flat(&items)
                == [(
                    vec![Key::Element],
                    vec!["3".to_string(), "4".to_string(), "5".to_string()]
                )]
        );
    }

    #[test]
    fn object_fields_follow_schema_order() {
        let schema = TypeSchema::object(
            ObjectSchema::new()
                .field("role", string())
                .field("firstName", string()),
        );
        let items =
            encode(&schema, &json!({"firstName": "Alex", "role": "admin"})).expect("encode");
        check!(
            flat(&items)
                == [
                    (vec![Key::field("role")], vec!["admin".to_string()]),
                    (vec![Key::field("firstName")], vec!["Alex".to_string()]),
                ]
        );
    }

    #[test]
    fn nested_array_of_objects_merges_values() {
        let user =
            TypeSchema::object(ObjectSchema::new().field("user", TypeSchema::array(string())));
        let schema = TypeSchema::object(ObjectSchema::new().field("role", TypeSchema::array(user)));
        let value = json!({"role": [{"user": ["admin"]}, {"user": ["anonymous"]}]});

        let items = encode(&schema, &value).expect("encode");
        check!(
            flat(&items)
                == [(
                    vec![
                        Key::field("role"),
                        Key::Element,
                        Key::field("user"),
                        Key::Element
                    ],
                    vec!["admin".to_string(), "anonymous".to_string()]
                )]
        );
    }

    #[test]
    fn absent_values() {
        let registry = SchemaRegistry::new();
        let encoder = Encoder::new(&registry);
        let path = FieldPath::root("id");

        let items = encoder
            .encode(&TypeSchema::nullable(int()), None, &path)
            .expect("nullable");
        check!(items.is_empty());
        let items = encoder
            .encode(&TypeSchema::nullable(int()), Some(&Value::Null), &path)
            .expect("nullable null");
        check!(items.is_empty());

        let_assert!(
            Err(Error::RequiredValueMissing { path }) = encoder.encode(&int(), None, &path)
        );
        check!(path == "id");
    }

    #[test]
    fn required_field_missing_reports_dotted_path() {
        let owner = TypeSchema::object(
            ObjectSchema::new()
                .field("name", string())
                .field("nickname", TypeSchema::nullable(string())),
        );
        let schema = TypeSchema::object(ObjectSchema::new().field("owner", owner));

        let result = encode(&schema, &json!({"owner": {"nickname": "bob"}}));
        let_assert!(Err(err) = result);
        check!(err.to_string() == "arg.owner.name: value is required");

        let items = encode(&schema, &json!({"owner": {"name": "Bob"}})).expect("optional");
        check!(items.len() == 1);
    }

    #[test]
    fn array_element_path_in_errors() {
        let schema = TypeSchema::array(int());
        let_assert!(Err(err) = encode(&schema, &json!([1, "x"])));
        check!(err.to_string() == "arg.1: expected integer, got string");
    }

    #[test]
    fn shape_mismatch() {
        let schema = TypeSchema::object(ObjectSchema::new().field("a", string()));
        let_assert!(
            Err(Error::SchemaMismatch { expected, actual, .. }) = encode(&schema, &json!(3))
        );
        check!(expected == "object");
        check!(actual == "number");

        let_assert!(
            Err(Error::SchemaMismatch { expected, .. }) =
                encode(&TypeSchema::array(int()), &json!({"a": 1}))
        );
        check!(expected == "array");
    }

    #[test]
    fn unknown_named_type_is_serialized_opaquely() {
        let schema = TypeSchema::named("Anything");
        let items = encode(&schema, &json!({"a": [true, 1]})).expect("encode");
        let item = items.find_default().expect("default item");
        check!(item.values() == [r#"{"a":[true,1]}"#]);

        let items = encode(&schema, &json!([1, "x"])).expect("encode");
        let item = items.find_default().expect("default item");
        check!(item.values() == [r#"[1,"x"]"#]);
    }

    #[test]
    fn named_types_resolve_through_registry() {
        let registry = SchemaRegistry::new()
            .with_scalar("Int32", ScalarKind::Integer)
            .with_object(
                "Pet",
                ObjectSchema::new()
                    .field("id", TypeSchema::named("Int32"))
                    .field("parent", TypeSchema::nullable(TypeSchema::named("Pet"))),
            );
        let encoder = Encoder::new(&registry);
        let value = json!({"id": 1, "parent": {"id": 2}});

        let items = encoder
            .encode(&TypeSchema::named("Pet"), Some(&value), &FieldPath::root("pet"))
            .expect("encode");
        check!(
            flat(&items)
                == [
                    (vec![Key::field("id")], vec!["1".to_string()]),
                    (
                        vec![Key::field("parent"), Key::field("id")],
                        vec!["2".to_string()]
                    ),
                ]
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let schema = TypeSchema::object(
            ObjectSchema::new()
                .field("tags", TypeSchema::array(string()))
                .field("limit", int()),
        );
        let value = json!({"limit": 10, "tags": ["a", "b"]});
        check!(encode(&schema, &value).ok() == encode(&schema, &value).ok());
    }
}
