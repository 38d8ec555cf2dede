//! Type translator: [`TypeDescriptor`] → JSON-Schema fragment.
//!
//! Every fragment produced here is a self-contained schema object, so it can
//! be embedded as `items`, `additionalProperties` or a property value as-is.
//! Translation never fails: shapes without a precise schema degrade to an
//! unconstrained `{}` or to a described string.

use serde_json::{Map, Value};

use crate::models::{LiteralValue, PrimitiveKind, RecordDescriptor, TemporalKind, TypeDescriptor};

/// A JSON-Schema-like mapping describing one value.
pub type SchemaFragment = Map<String, Value>;

const DURATION_NOTE: &str = "Duration (ISO 8601 or human-readable).";
const STRINGIFIED_KEYS_NOTE: &str = "Keys will be stringified.";

/// Translates a type descriptor into a schema fragment.
pub fn translate(ty: &TypeDescriptor) -> SchemaFragment {
    match ty {
        TypeDescriptor::Null => typed("null"),
        TypeDescriptor::Primitive(kind) => typed(kind.json_type()),
        TypeDescriptor::Temporal(kind) => temporal(*kind),
        TypeDescriptor::Enumeration { values, .. } => value_set(values, false),
        TypeDescriptor::Record(record) => record_schema(record),
        TypeDescriptor::LiteralSet(values) => value_set(values, true),
        TypeDescriptor::Union { members, nullable } => union(members, *nullable),
        TypeDescriptor::Sequence(elements) => {
            let items = elements.first().map(translate).unwrap_or_default();
            let mut fragment = typed("array");
            fragment.insert("items".into(), Value::Object(items));
            fragment
        }
        TypeDescriptor::Mapping { key, value } => mapping(key.as_deref(), value.as_deref()),
        TypeDescriptor::Any => SchemaFragment::new(),
        TypeDescriptor::Unknown(name) => {
            tracing::debug!(type_name = %name, "no schema for type, falling back to string");
            let mut fragment = typed("string");
            fragment.insert(
                "description".into(),
                Value::String(format!("Serialized {name}.")),
            );
            fragment
        }
    }
}

fn typed(json_type: &str) -> SchemaFragment {
    let mut fragment = SchemaFragment::new();
    fragment.insert("type".into(), Value::String(json_type.to_owned()));
    fragment
}

fn temporal(kind: TemporalKind) -> SchemaFragment {
    let mut fragment = typed("string");
    match kind {
        TemporalKind::Instant => {
            fragment.insert("format".into(), "date-time".into());
        }
        TemporalKind::Date => {
            fragment.insert("format".into(), "date".into());
        }
        TemporalKind::Time => {
            fragment.insert("format".into(), "time".into());
        }
        TemporalKind::Duration => {
            fragment.insert("description".into(), DURATION_NOTE.into());
        }
    }
    fragment
}

/// Infers a base type for a set of constants. Enumerations stop at
/// string/integer; literal sets also accept a mixed-number `number` type.
fn value_set(values: &[LiteralValue], allow_number: bool) -> SchemaFragment {
    let json_type = if values.iter().all(LiteralValue::is_string) {
        Some(PrimitiveKind::String)
    } else if values.iter().all(LiteralValue::is_integer) {
        Some(PrimitiveKind::Integer)
    } else if allow_number && values.iter().all(LiteralValue::is_number) {
        Some(PrimitiveKind::Float)
    } else {
        None
    };

    let mut fragment = json_type
        .map(|kind| typed(kind.json_type()))
        .unwrap_or_default();
    fragment.insert(
        "enum".into(),
        Value::Array(values.iter().map(LiteralValue::to_json).collect()),
    );
    fragment
}

fn record_schema(record: &RecordDescriptor) -> SchemaFragment {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &record.fields {
        properties.insert(field.name.clone(), Value::Object(translate(&field.ty)));
        if record.total && !field.has_default && !field.ty.is_nullable() {
            required.push(Value::String(field.name.clone()));
        }
    }

    let mut fragment = typed("object");
    fragment.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        fragment.insert("required".into(), Value::Array(required));
    }
    fragment
}

fn union(members: &[TypeDescriptor], nullable: bool) -> SchemaFragment {
    let nullable = nullable || members.contains(&TypeDescriptor::Null);
    let members: Vec<&TypeDescriptor> = members
        .iter()
        .filter(|member| **member != TypeDescriptor::Null)
        .collect();

    match members.as_slice() {
        // Optional of a single type: nullability is expressed through
        // required-ness, not through a null branch.
        [only] => translate(only),
        [] if nullable => typed("null"),
        [] => SchemaFragment::new(),
        many => {
            let mut branches: Vec<Value> = many
                .iter()
                .map(|member| Value::Object(translate(member)))
                .collect();
            if nullable {
                branches.push(Value::Object(typed("null")));
            }
            let mut fragment = SchemaFragment::new();
            fragment.insert("anyOf".into(), Value::Array(branches));
            fragment
        }
    }
}

fn mapping(key: Option<&TypeDescriptor>, value: Option<&TypeDescriptor>) -> SchemaFragment {
    let mut fragment = typed("object");
    fragment.insert(
        "additionalProperties".into(),
        Value::Object(value.map(translate).unwrap_or_default()),
    );
    if key != Some(&TypeDescriptor::string()) {
        fragment.insert("description".into(), STRINGIFIED_KEYS_NOTE.into());
    }
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordDescriptor;
    use serde_json::json;

    fn schema(ty: &TypeDescriptor) -> Value {
        Value::Object(translate(ty))
    }

    #[test]
    fn test_primitive_schemas() {
        assert_eq!(schema(&TypeDescriptor::Null), json!({ "type": "null" }));
        assert_eq!(schema(&TypeDescriptor::string()), json!({ "type": "string" }));
        assert_eq!(schema(&TypeDescriptor::integer()), json!({ "type": "integer" }));
        assert_eq!(schema(&TypeDescriptor::float()), json!({ "type": "number" }));
        assert_eq!(schema(&TypeDescriptor::boolean()), json!({ "type": "boolean" }));
    }

    #[test]
    fn test_temporal_schemas() {
        assert_eq!(
            schema(&TypeDescriptor::Temporal(TemporalKind::Instant)),
            json!({ "type": "string", "format": "date-time" })
        );
        assert_eq!(
            schema(&TypeDescriptor::Temporal(TemporalKind::Date)),
            json!({ "type": "string", "format": "date" })
        );
        assert_eq!(
            schema(&TypeDescriptor::Temporal(TemporalKind::Time)),
            json!({ "type": "string", "format": "time" })
        );
        assert_eq!(
            schema(&TypeDescriptor::Temporal(TemporalKind::Duration)),
            json!({ "type": "string", "description": "Duration (ISO 8601 or human-readable)." })
        );
    }

    #[test]
    fn test_enumeration_value_inference() {
        let strings = TypeDescriptor::enumeration("Cabin", ["A".into(), "B".into()]);
        assert_eq!(
            schema(&strings),
            json!({ "type": "string", "enum": ["A", "B"] })
        );

        let ints = TypeDescriptor::enumeration("Stars", [1.into(), 2.into()]);
        assert_eq!(schema(&ints), json!({ "type": "integer", "enum": [1, 2] }));

        let mixed = TypeDescriptor::enumeration("Mixed", ["a".into(), 1.into()]);
        assert_eq!(schema(&mixed), json!({ "enum": ["a", 1] }));

        // Enumerations never infer "number".
        let floats = TypeDescriptor::enumeration("Ratio", [0.5.into(), 1.into()]);
        assert_eq!(schema(&floats), json!({ "enum": [0.5, 1] }));
    }

    #[test]
    fn test_literal_set_inference() {
        let numbers = TypeDescriptor::literals([1.into(), 2.5.into()]);
        assert_eq!(
            schema(&numbers),
            json!({ "type": "number", "enum": [1, 2.5] })
        );

        let units = TypeDescriptor::literals(["metric".into(), "imperial".into()]);
        assert_eq!(
            schema(&units),
            json!({ "type": "string", "enum": ["metric", "imperial"] })
        );

        let flags = TypeDescriptor::literals([true.into(), false.into()]);
        assert_eq!(schema(&flags), json!({ "enum": [true, false] }));
    }

    #[test]
    fn test_record_required_fields() {
        let record = RecordDescriptor::new("Leg")
            .field("x", TypeDescriptor::integer())
            .field_with_default("y", TypeDescriptor::integer())
            .field("note", TypeDescriptor::optional(TypeDescriptor::string()));

        assert_eq!(
            schema(&TypeDescriptor::Record(record)),
            json!({
                "type": "object",
                "properties": {
                    "x": { "type": "integer" },
                    "y": { "type": "integer" },
                    "note": { "type": "string" }
                },
                "required": ["x"]
            })
        );
    }

    #[test]
    fn test_non_total_record_omits_required() {
        let record = RecordDescriptor::new("Filters")
            .total(false)
            .field("city", TypeDescriptor::string());

        assert_eq!(
            schema(&TypeDescriptor::Record(record)),
            json!({
                "type": "object",
                "properties": { "city": { "type": "string" } }
            })
        );
    }

    #[test]
    fn test_optional_single_elides_null() {
        let ty = TypeDescriptor::optional(TypeDescriptor::integer());
        assert_eq!(schema(&ty), json!({ "type": "integer" }));
    }

    #[test]
    fn test_optional_union_keeps_null_branch() {
        let ty = TypeDescriptor::union([
            TypeDescriptor::integer(),
            TypeDescriptor::string(),
            TypeDescriptor::Null,
        ]);
        assert_eq!(
            schema(&ty),
            json!({ "anyOf": [{ "type": "integer" }, { "type": "string" }, { "type": "null" }] })
        );
    }

    #[test]
    fn test_plain_union() {
        let ty = TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::string()]);
        assert_eq!(
            schema(&ty),
            json!({ "anyOf": [{ "type": "integer" }, { "type": "string" }] })
        );
    }

    #[test]
    fn test_degenerate_unions() {
        let empty = TypeDescriptor::Union {
            members: vec![],
            nullable: false,
        };
        assert_eq!(schema(&empty), json!({}));

        let only_null = TypeDescriptor::Union {
            members: vec![TypeDescriptor::Null],
            nullable: false,
        };
        assert_eq!(schema(&only_null), json!({ "type": "null" }));
    }

    #[test]
    fn test_sequence_schemas() {
        let list = TypeDescriptor::sequence(TypeDescriptor::string());
        assert_eq!(
            schema(&list),
            json!({ "type": "array", "items": { "type": "string" } })
        );

        let untyped = TypeDescriptor::Sequence(vec![]);
        assert_eq!(schema(&untyped), json!({ "type": "array", "items": {} }));

        let tuple =
            TypeDescriptor::Sequence(vec![TypeDescriptor::integer(), TypeDescriptor::string()]);
        assert_eq!(
            schema(&tuple),
            json!({ "type": "array", "items": { "type": "integer" } })
        );
    }

    #[test]
    fn test_nested_sequence_of_records() {
        let leg = RecordDescriptor::new("Leg").field("from", TypeDescriptor::string());
        let ty = TypeDescriptor::sequence(TypeDescriptor::Record(leg));
        assert_eq!(
            schema(&ty),
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": { "from": { "type": "string" } },
                    "required": ["from"]
                }
            })
        );
    }

    #[test]
    fn test_mapping_schemas() {
        let by_name = TypeDescriptor::mapping(TypeDescriptor::string(), TypeDescriptor::float());
        assert_eq!(
            schema(&by_name),
            json!({ "type": "object", "additionalProperties": { "type": "number" } })
        );

        let by_id = TypeDescriptor::mapping(TypeDescriptor::integer(), TypeDescriptor::string());
        assert_eq!(
            schema(&by_id),
            json!({
                "type": "object",
                "additionalProperties": { "type": "string" },
                "description": "Keys will be stringified."
            })
        );

        let untyped = TypeDescriptor::Mapping {
            key: None,
            value: None,
        };
        assert_eq!(
            schema(&untyped),
            json!({
                "type": "object",
                "additionalProperties": {},
                "description": "Keys will be stringified."
            })
        );
    }

    #[test]
    fn test_any_and_unknown() {
        assert_eq!(schema(&TypeDescriptor::Any), json!({}));
        assert_eq!(
            schema(&TypeDescriptor::unknown("Uuid")),
            json!({ "type": "string", "description": "Serialized Uuid." })
        );
    }
}
