//! The in-memory LLSD value tree.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::constants::*;

/// Ordered string-keyed map. Iteration follows insertion order, equality
/// ignores it.
pub type Map = IndexMap<String, Value>;

/// Any LLSD value.
///
/// Each scalar variant corresponds to exactly one wire element; containers
/// correspond to `map` and `array`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    /// Hyphenated UUID text, kept verbatim as received.
    Uuid(String),
    Date(DateTime<Utc>),
    /// `None` is the empty link (`<uri/>`), distinct from `Some("")`.
    Uri(Option<String>),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Map(Map),
}

impl Value {
    /// The nil UUID, decode default for `<uuid/>`.
    pub fn nil_uuid() -> Self {
        Value::Uuid(NIL_UUID.to_owned())
    }

    /// The Unix epoch, decode default for `<date/>`.
    pub fn epoch() -> Self {
        Value::Date(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Wire element name this value is written as.
    pub fn element_name(&self) -> &'static str {
        match self {
            Value::Undefined => UNDEF_ELEMENT,
            Value::Boolean(_) => BOOLEAN_ELEMENT,
            Value::Integer(_) => INTEGER_ELEMENT,
            Value::Real(_) => REAL_ELEMENT,
            Value::String(_) => STRING_ELEMENT,
            Value::Uuid(_) => UUID_ELEMENT,
            Value::Date(_) => DATE_ELEMENT,
            Value::Uri(_) => URI_ELEMENT,
            Value::Binary(_) => BINARY_ELEMENT,
            Value::Array(_) => ARRAY_ELEMENT,
            Value::Map(_) => MAP_ELEMENT,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Reals as-is, integers widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text of a `String`, `Uuid` or present `Uri`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Uuid(s) => Some(s),
            Value::Uri(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Parses a `Uuid` value. Returns `None` for other variants and for
    /// text that is not a valid UUID.
    pub fn as_uuid(&self) -> Option<uuid::Uuid> {
        match self {
            Value::Uuid(s) => uuid::Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(u: uuid::Uuid) -> Self {
        Value::Uuid(u.hyphenated().to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Binary(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    /// Builds a map; a repeated key keeps its first position and last value.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
