//! Static type descriptions for Rust types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::net::IpAddr;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::models::{PrimitiveKind, TemporalKind, TypeDescriptor};

/// Types that can describe their own shape for the schema compiler.
///
/// Implemented for std scalars, collections, `Option`, tuples, the chrono
/// date/time types and a few common opaque types. Derive it for your own
/// structs and enums with `#[derive(Describe)]`.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

macro_rules! primitive {
    ($kind:expr => $($t:ty),+ $(,)?) => {
        $(
            impl Describe for $t {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Primitive($kind)
                }
            }
        )+
    };
}

primitive!(PrimitiveKind::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
primitive!(PrimitiveKind::Float => f32, f64);
primitive!(PrimitiveKind::Boolean => bool);
primitive!(PrimitiveKind::String => String, str, char);

macro_rules! opaque {
    ($($t:ty => $name:expr),+ $(,)?) => {
        $(
            impl Describe for $t {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Unknown($name.to_owned())
                }
            }
        )+
    };
}

opaque!(uuid::Uuid => "Uuid", PathBuf => "PathBuf", IpAddr => "IpAddr");

impl Describe for () {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Null
    }
}

impl Describe for Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Any
    }
}

impl Describe for serde_json::Map<String, Value> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(TypeDescriptor::string(), TypeDescriptor::Any)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::optional(T::describe())
    }
}

// Pointers and references describe their pointee.
impl<T: Describe + ?Sized> Describe for &T {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe + ?Sized> Describe for Rc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

macro_rules! sequence {
    ($($t:ident),+) => {
        $(
            impl<T: Describe> Describe for $t<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::sequence(T::describe())
                }
            }
        )+
    };
}

sequence!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<T: Describe, S> Describe for IndexSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(K::describe(), V::describe())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(K::describe(), V::describe())
    }
}

impl<K: Describe, V: Describe, S> Describe for IndexMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(K::describe(), V::describe())
    }
}

// Tuples become sequences of their element types.
macro_rules! tuples {
    ($(($($T:ident),+))+) => {
        $(
            impl<$($T: Describe),+> Describe for ($($T,)+) {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Sequence(vec![$($T::describe()),+])
                }
            }
        )+
    };
}

tuples! {
    (A)
    (A, B)
    (A, B, C)
    (A, B, C, D)
    (A, B, C, D, E)
    (A, B, C, D, E, F)
    (A, B, C, D, E, F, G)
    (A, B, C, D, E, F, G, H)
    (A, B, C, D, E, F, G, H, I)
    (A, B, C, D, E, F, G, H, I, J)
    (A, B, C, D, E, F, G, H, I, J, K)
    (A, B, C, D, E, F, G, H, I, J, K, L)
}

// ────────────────────────────────────────────────────────────────────────────
// Date and time
// ────────────────────────────────────────────────────────────────────────────

impl<Tz: chrono::TimeZone> Describe for chrono::DateTime<Tz> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Temporal(TemporalKind::Instant)
    }
}

impl Describe for chrono::NaiveDateTime {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Temporal(TemporalKind::Instant)
    }
}

impl Describe for chrono::NaiveDate {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Temporal(TemporalKind::Date)
    }
}

impl Describe for chrono::NaiveTime {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Temporal(TemporalKind::Time)
    }
}

impl Describe for chrono::TimeDelta {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Temporal(TemporalKind::Duration)
    }
}

impl Describe for std::time::Duration {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Temporal(TemporalKind::Duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::translate;
    use serde_json::json;

    fn schema<T: Describe + ?Sized>() -> Value {
        Value::Object(translate(&T::describe()))
    }

    #[test]
    fn test_primitive_descriptions() {
        assert_eq!(schema::<bool>(), json!({ "type": "boolean" }));
        assert_eq!(schema::<i32>(), json!({ "type": "integer" }));
        assert_eq!(schema::<u128>(), json!({ "type": "integer" }));
        assert_eq!(schema::<f64>(), json!({ "type": "number" }));
        assert_eq!(schema::<String>(), json!({ "type": "string" }));
        assert_eq!(schema::<&str>(), json!({ "type": "string" }));
        assert_eq!(schema::<char>(), json!({ "type": "string" }));
        assert_eq!(schema::<()>(), json!({ "type": "null" }));
    }

    #[test]
    fn test_option_is_nullable_union() {
        assert!(<Option<String>>::describe().is_nullable());
        assert_eq!(schema::<Option<String>>(), json!({ "type": "string" }));
        assert_eq!(
            <Option<Option<i32>>>::describe(),
            <Option<i32>>::describe()
        );
    }

    #[test]
    fn test_collection_descriptions() {
        let expected = json!({ "type": "array", "items": { "type": "integer" } });
        assert_eq!(schema::<Vec<i32>>(), expected);
        assert_eq!(schema::<VecDeque<i32>>(), expected);
        assert_eq!(schema::<HashSet<i32>>(), expected);
        assert_eq!(schema::<[i32; 3]>(), expected);
        assert_eq!(schema::<&[i32]>(), expected);
        assert_eq!(schema::<Box<Vec<i32>>>(), expected);
    }

    #[test]
    fn test_tuple_uses_first_element() {
        assert_eq!(
            <(i32, String)>::describe(),
            TypeDescriptor::Sequence(vec![TypeDescriptor::integer(), TypeDescriptor::string()])
        );
        assert_eq!(
            schema::<(i32, String)>(),
            json!({ "type": "array", "items": { "type": "integer" } })
        );
    }

    #[test]
    fn test_map_descriptions() {
        assert_eq!(
            schema::<HashMap<String, f64>>(),
            json!({ "type": "object", "additionalProperties": { "type": "number" } })
        );
        assert_eq!(
            schema::<BTreeMap<u32, bool>>(),
            json!({
                "type": "object",
                "additionalProperties": { "type": "boolean" },
                "description": "Keys will be stringified."
            })
        );
        assert_eq!(
            schema::<serde_json::Map<String, Value>>(),
            json!({ "type": "object", "additionalProperties": {} })
        );
    }

    #[test]
    fn test_temporal_descriptions() {
        assert_eq!(
            schema::<chrono::DateTime<chrono::Utc>>(),
            json!({ "type": "string", "format": "date-time" })
        );
        assert_eq!(
            schema::<chrono::NaiveDate>(),
            json!({ "type": "string", "format": "date" })
        );
        assert_eq!(
            schema::<chrono::NaiveTime>(),
            json!({ "type": "string", "format": "time" })
        );
        assert_eq!(
            schema::<std::time::Duration>()["description"],
            "Duration (ISO 8601 or human-readable)."
        );
    }

    #[test]
    fn test_opaque_and_any() {
        assert_eq!(
            schema::<uuid::Uuid>(),
            json!({ "type": "string", "description": "Serialized Uuid." })
        );
        assert_eq!(
            schema::<PathBuf>(),
            json!({ "type": "string", "description": "Serialized PathBuf." })
        );
        assert_eq!(schema::<Value>(), json!({}));
    }
}
