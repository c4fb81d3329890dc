//! Symbolic values as the engine serializes them, and the extractor that
//! reduces them to plain concrete values.
//!
//! The engine writes every symbolic argument and result as an object that
//! may carry a `concrete` field next to its symbolic metadata. Whether a
//! JSON value is such a wrapper is decided once, when it is deserialized:
//!
//! - no `concrete` key (or not an object at all): [`SymbolicValue::Plain`]
//! - `concrete` holds an object or array: [`Concrete::Members`], each
//!   member classified again
//! - `concrete` holds anything else: [`Concrete::Scalar`]

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

const CONCRETE_KEY: &str = "concrete";

/// A plain JavaScript-like literal with no symbolic metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum ConcreteValue {
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ConcreteValue>),
    /// Members in source order.
    Object(Vec<(String, ConcreteValue)>),
}

impl ConcreteValue {
    /// Build an object from `(key, value)` pairs, keeping their order.
    pub fn object<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConcreteValue)>,
    {
        ConcreteValue::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up an object member by key. `None` for non-objects and missing keys.
    pub fn get(&self, key: &str) -> Option<&ConcreteValue> {
        match self {
            ConcreteValue::Object(members) => {
                members.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

impl From<Value> for ConcreteValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConcreteValue::Null,
            Value::Bool(b) => ConcreteValue::Bool(b),
            Value::Number(n) => ConcreteValue::Number(n),
            Value::String(s) => ConcreteValue::String(s),
            Value::Array(items) => {
                ConcreteValue::Array(items.into_iter().map(ConcreteValue::from).collect())
            }
            Value::Object(map) => ConcreteValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, ConcreteValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ConcreteValue {
    fn from(s: &str) -> Self {
        ConcreteValue::String(s.to_string())
    }
}

impl From<String> for ConcreteValue {
    fn from(s: String) -> Self {
        ConcreteValue::String(s)
    }
}

impl From<bool> for ConcreteValue {
    fn from(b: bool) -> Self {
        ConcreteValue::Bool(b)
    }
}

impl From<i64> for ConcreteValue {
    fn from(n: i64) -> Self {
        ConcreteValue::Number(n.into())
    }
}

impl<'de> Deserialize<'de> for ConcreteValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ConcreteValue::from)
    }
}

/// The payload of a wrapper's `concrete` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Concrete {
    /// Composite payload. Arrays contribute their indices as keys.
    Members(Vec<(String, SymbolicValue)>),
    /// Non-composite payload, taken as-is.
    Scalar(ConcreteValue),
}

impl From<Value> for Concrete {
    fn from(payload: Value) -> Self {
        match payload {
            Value::Object(map) => Concrete::Members(
                map.into_iter()
                    .map(|(k, v)| (k, SymbolicValue::from(v)))
                    .collect(),
            ),
            Value::Array(items) => Concrete::Members(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), SymbolicValue::from(v)))
                    .collect(),
            ),
            scalar => Concrete::Scalar(ConcreteValue::from(scalar)),
        }
    }
}

/// A value as recorded by the engine: either already plain, or a wrapper
/// around a concrete payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicValue {
    Plain(ConcreteValue),
    Wrapped(Concrete),
}

impl SymbolicValue {
    /// Reduce to the plain value this represents.
    pub fn extract(&self) -> ConcreteValue {
        match self {
            SymbolicValue::Plain(value) => value.clone(),
            SymbolicValue::Wrapped(Concrete::Scalar(value)) => value.clone(),
            SymbolicValue::Wrapped(Concrete::Members(members)) => ConcreteValue::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.extract()))
                    .collect(),
            ),
        }
    }

    /// Owning variant of [`SymbolicValue::extract`].
    pub fn into_concrete(self) -> ConcreteValue {
        match self {
            SymbolicValue::Plain(value) => value,
            SymbolicValue::Wrapped(Concrete::Scalar(value)) => value,
            SymbolicValue::Wrapped(Concrete::Members(members)) => ConcreteValue::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, v.into_concrete()))
                    .collect(),
            ),
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, SymbolicValue::Wrapped(_))
    }
}

/// Free-function form of [`SymbolicValue::extract`].
pub fn extract_concrete_value(value: &SymbolicValue) -> ConcreteValue {
    value.extract()
}

impl From<Value> for SymbolicValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key(CONCRETE_KEY) => {
                // Sibling metadata (`symbolic`, `_name`, `_core`, ...) is dropped here.
                let payload = map
                    .into_iter()
                    .find_map(|(k, v)| (k == CONCRETE_KEY).then_some(v))
                    .unwrap_or(Value::Null);
                SymbolicValue::Wrapped(Concrete::from(payload))
            }
            other => SymbolicValue::Plain(ConcreteValue::from(other)),
        }
    }
}

/// An already-plain value is never re-inspected for wrappers.
impl From<ConcreteValue> for SymbolicValue {
    fn from(value: ConcreteValue) -> Self {
        SymbolicValue::Plain(value)
    }
}

impl<'de> Deserialize<'de> for SymbolicValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SymbolicValue::from)
    }
}
