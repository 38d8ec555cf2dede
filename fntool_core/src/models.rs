//! Descriptor models consumed by the schema compiler.
//!
//! A [`FunctionDescriptor`] is the static stand-in for a function signature:
//! ordered parameters with a [`TypeDescriptor`] each, plus the raw doc text.
//! Descriptors are built by hand with the builder methods below, through the
//! [`Describe`](crate::Describe) trait, or by the `#[tool]` macro.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar JSON kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl PrimitiveKind {
    /// The JSON-Schema `type` keyword for this kind.
    pub const fn json_type(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }
}

/// Date and time kinds that travel as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// A point in time (`date-time`).
    Instant,
    /// A calendar date (`date`).
    Date,
    /// A time of day (`time`).
    Time,
    /// A span of time. JSON Schema has no native format for it.
    Duration,
}

/// A constant allowed by an enumeration or a literal set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl LiteralValue {
    pub fn is_string(&self) -> bool {
        matches!(self, LiteralValue::String(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, LiteralValue::Integer(_))
    }

    /// Integers and floats, but not booleans.
    pub fn is_number(&self) -> bool {
        matches!(self, LiteralValue::Integer(_) | LiteralValue::Float(_))
    }

    pub fn to_json(&self) -> Value {
        match self {
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Integer(i) => Value::from(*i),
            // Non-finite floats have no JSON form.
            LiteralValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            LiteralValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_owned())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Integer(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Integer(value.into())
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Float(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

/// One named field of a structured record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    pub has_default: bool,
}

/// A fixed-shape record: a struct with named fields or a typed map shape.
///
/// `total == false` makes every field optional regardless of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    pub name: String,
    pub total: bool,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: true,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn total(mut self, total: bool) -> Self {
        self.total = total;
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            has_default: false,
        });
        self
    }

    #[must_use]
    pub fn field_with_default(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            has_default: true,
        });
        self
    }
}

/// Semantic shape of a value, independent of any host language.
///
/// The set of variants is closed; anything the translator cannot express
/// precisely goes through [`TypeDescriptor::Unknown`] or [`TypeDescriptor::Any`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// The unit / none type.
    Null,
    Primitive(PrimitiveKind),
    Temporal(TemporalKind),
    /// A named enumeration whose members carry the listed values.
    Enumeration {
        name: String,
        values: Vec<LiteralValue>,
    },
    Record(RecordDescriptor),
    /// An anonymous set of allowed constants.
    LiteralSet(Vec<LiteralValue>),
    /// A union of non-null members; `nullable` adds the null branch.
    Union {
        members: Vec<TypeDescriptor>,
        nullable: bool,
    },
    /// List, tuple or set shapes. Only the first element type constrains
    /// `items`; an empty list means untyped.
    Sequence(Vec<TypeDescriptor>),
    /// A string-keyed JSON object; `None` means untyped.
    Mapping {
        key: Option<Box<TypeDescriptor>>,
        value: Option<Box<TypeDescriptor>>,
    },
    /// No constraint at all.
    Any,
    /// A type with no schema counterpart, kept by display name.
    Unknown(String),
}

impl TypeDescriptor {
    pub fn string() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::String)
    }

    pub fn integer() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Integer)
    }

    pub fn float() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Float)
    }

    pub fn boolean() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Boolean)
    }

    /// `inner` or null.
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::union([inner, TypeDescriptor::Null])
    }

    /// Builds a normalized union: nested unions are flattened, `Null` members
    /// turn into the nullable flag and duplicates are dropped. A union left
    /// with a single non-null member and no null collapses to that member.
    pub fn union(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut flat = Vec::new();
        let mut nullable = false;
        for member in members {
            match member {
                TypeDescriptor::Null => nullable = true,
                TypeDescriptor::Union {
                    members,
                    nullable: inner_nullable,
                } => {
                    nullable |= inner_nullable;
                    for inner in members {
                        if !flat.contains(&inner) {
                            flat.push(inner);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }

        match (flat.len(), nullable) {
            (0, true) => TypeDescriptor::Null,
            (1, false) => flat.remove(0),
            _ => TypeDescriptor::Union {
                members: flat,
                nullable,
            },
        }
    }

    pub fn sequence(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(vec![element])
    }

    pub fn mapping(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Mapping {
            key: Some(Box::new(key)),
            value: Some(Box::new(value)),
        }
    }

    pub fn enumeration(
        name: impl Into<String>,
        values: impl IntoIterator<Item = LiteralValue>,
    ) -> Self {
        TypeDescriptor::Enumeration {
            name: name.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn literals(values: impl IntoIterator<Item = LiteralValue>) -> Self {
        TypeDescriptor::LiteralSet(values.into_iter().collect())
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        TypeDescriptor::Unknown(name.into())
    }

    /// True for the "optional-shaped" case: a union that admits null.
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeDescriptor::Union { members, nullable } => {
                *nullable || members.contains(&TypeDescriptor::Null)
            }
            _ => false,
        }
    }
}

/// One declared parameter of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    pub has_default: bool,
    /// The default, when it is known and serializable. Never written into schemas.
    pub default: Option<Value>,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.has_default = true;
        self.default = Some(default);
        self
    }

    /// Marks the parameter as defaulted without recording the value.
    #[must_use]
    pub fn with_default_marker(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// Static metadata of a function about to be exposed as a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub doc: String,
    pub params: Vec<ParamDescriptor>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.params.push(ParamDescriptor::new(name, ty));
        self
    }

    #[must_use]
    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        default: Value,
    ) -> Self {
        self.params
            .push(ParamDescriptor::new(name, ty).with_default(default));
        self
    }

    #[must_use]
    pub fn push_param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_wraps_in_nullable_union() {
        let ty = TypeDescriptor::optional(TypeDescriptor::string());
        assert_eq!(
            ty,
            TypeDescriptor::Union {
                members: vec![TypeDescriptor::string()],
                nullable: true,
            }
        );
        assert!(ty.is_nullable());
    }

    #[test]
    fn test_union_flattens_and_dedups() {
        let ty = TypeDescriptor::union([
            TypeDescriptor::integer(),
            TypeDescriptor::optional(TypeDescriptor::string()),
            TypeDescriptor::integer(),
        ]);
        assert_eq!(
            ty,
            TypeDescriptor::Union {
                members: vec![TypeDescriptor::integer(), TypeDescriptor::string()],
                nullable: true,
            }
        );
    }

    #[test]
    fn test_union_collapses() {
        assert_eq!(
            TypeDescriptor::union([TypeDescriptor::boolean()]),
            TypeDescriptor::boolean()
        );
        assert_eq!(
            TypeDescriptor::optional(TypeDescriptor::Null),
            TypeDescriptor::Null
        );
        // Option<Option<T>> is still a single optional layer.
        let nested =
            TypeDescriptor::optional(TypeDescriptor::optional(TypeDescriptor::integer()));
        assert_eq!(nested, TypeDescriptor::optional(TypeDescriptor::integer()));
    }

    #[test]
    fn test_plain_union_is_not_nullable() {
        let ty = TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::string()]);
        assert!(!ty.is_nullable());
        assert!(!TypeDescriptor::string().is_nullable());
    }

    #[test]
    fn test_literal_to_json() {
        assert_eq!(LiteralValue::from("a").to_json(), json!("a"));
        assert_eq!(LiteralValue::from(3).to_json(), json!(3));
        assert_eq!(LiteralValue::from(1.5).to_json(), json!(1.5));
        assert_eq!(LiteralValue::from(true).to_json(), json!(true));
        assert_eq!(LiteralValue::Float(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_default_flag_is_independent_of_value() {
        let marked = ParamDescriptor::new("units", TypeDescriptor::string()).with_default_marker();
        assert!(marked.has_default);
        assert_eq!(marked.default, None);

        // `#[default(None)]` records a null default, which is still a default.
        let null = ParamDescriptor::new("note", TypeDescriptor::string()).with_default(Value::Null);
        assert!(null.has_default);
        assert_eq!(null.default, Some(Value::Null));

        let plain = ParamDescriptor::new("query", TypeDescriptor::string());
        assert!(!plain.has_default);
        assert_eq!(plain.default, None);
    }

    #[test]
    fn test_function_builder() {
        let function = FunctionDescriptor::new("search")
            .doc("Search things.")
            .param("query", TypeDescriptor::string())
            .param_with_default("limit", TypeDescriptor::integer(), json!(10));

        assert_eq!(function.params.len(), 2);
        assert!(!function.params[0].has_default);
        assert!(function.params[1].has_default);
        assert_eq!(function.params[1].default, Some(json!(10)));
    }
}
