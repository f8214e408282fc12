//! Conversion from any `serde::Serialize` type into a [`Value`], and the
//! `Serialize` impl that lets a [`Value`] flow into other serde formats.
//!
//! Enum variants use the externally tagged shape: unit variants become
//! their name, the others a single-entry map keyed by the variant name.

use serde::ser::{self, Serialize, SerializeMap as _, SerializeSeq as _};

use crate::error::LlsdError;
use crate::text;
use crate::value::{Map, Value};

// Newtype names `Serialize for Value` wraps typed scalars in, so that
// `ValueSerializer` can rebuild the variant. Other serializers only see the
// inner text.
const UUID_MARKER: &str = "$llsd::Uuid";
const DATE_MARKER: &str = "$llsd::Date";
const URI_MARKER: &str = "$llsd::Uri";
const BINARY_MARKER: &str = "$llsd::Binary";

/// Converts `value` into a [`Value`].
///
/// Fails with [`LlsdError::UnsupportedType`] for integers outside the `i64`
/// range and for map keys that are not strings, chars or integers.
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value, LlsdError> {
    value.serialize(ValueSerializer)
}

/// Serializer whose output is a [`Value`] tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = LlsdError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, LlsdError> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, LlsdError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, LlsdError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, LlsdError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, LlsdError> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, LlsdError> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| LlsdError::unsupported(format!("i128 value {v}")))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, LlsdError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, LlsdError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, LlsdError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, LlsdError> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| LlsdError::unsupported(format!("u64 value {v}")))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, LlsdError> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| LlsdError::unsupported(format!("u128 value {v}")))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, LlsdError> {
        Ok(Value::Real(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, LlsdError> {
        Ok(Value::Real(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, LlsdError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, LlsdError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, LlsdError> {
        Ok(Value::Binary(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, LlsdError> {
        Ok(Value::Undefined)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, LlsdError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, LlsdError> {
        Ok(Value::Undefined)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, LlsdError> {
        Ok(Value::Undefined)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, LlsdError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, LlsdError> {
        let inner = value.serialize(self)?;
        Ok(match (name, inner) {
            (UUID_MARKER, Value::String(s)) => Value::Uuid(s),
            (DATE_MARKER, Value::String(s)) => Value::Date(text::parse_date(&s)),
            (URI_MARKER, Value::String(s)) => Value::Uri(Some(s)),
            (URI_MARKER, Value::Undefined) => Value::Uri(None),
            (BINARY_MARKER, Value::String(s)) => Value::Binary(text::parse_binary(&s)),
            (_, inner) => inner,
        })
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, LlsdError> {
        let mut map = Map::new();
        map.insert(variant.to_owned(), to_value(value)?);
        Ok(Value::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, LlsdError> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, LlsdError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, LlsdError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, LlsdError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap, LlsdError> {
        Ok(SerializeMap {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap, LlsdError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant, LlsdError> {
        Ok(SerializeStructVariant {
            variant,
            map: Map::with_capacity(len),
        })
    }
}

pub struct SerializeVec {
    items: Vec<Value>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

pub struct SerializeMap {
    map: Map,
    next_key: Option<String>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: Map,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = LlsdError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), LlsdError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, LlsdError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = LlsdError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), LlsdError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, LlsdError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = LlsdError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), LlsdError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, LlsdError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = LlsdError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), LlsdError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, LlsdError> {
        let mut map = Map::new();
        map.insert(self.variant.to_owned(), Value::Array(self.items));
        Ok(Value::Map(map))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = LlsdError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), LlsdError> {
        self.next_key = Some(map_key(to_value(key)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), LlsdError> {
        let key = self.next_key.take().ok_or_else(|| {
            LlsdError::Custom("serialize_value called before serialize_key".into())
        })?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, LlsdError> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = LlsdError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), LlsdError> {
        self.map.insert(key.to_owned(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, LlsdError> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = LlsdError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), LlsdError> {
        self.map.insert(key.to_owned(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, LlsdError> {
        let mut outer = Map::new();
        outer.insert(self.variant.to_owned(), Value::Map(self.map));
        Ok(Value::Map(outer))
    }
}

fn map_key(key: Value) -> Result<String, LlsdError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        other => Err(LlsdError::unsupported(format!(
            "map key of kind `{}`",
            other.element_name()
        ))),
    }
}

/// Binary payload: base64 text for human-readable formats, raw bytes
/// otherwise.
struct BinaryBody<'a>(&'a [u8]);

impl Serialize for BinaryBody<'_> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&text::render_binary(self.0))
        } else {
            serializer.serialize_bytes(self.0)
        }
    }
}

impl Serialize for Value {
    /// UUIDs, dates, URIs and binary are written as their text inside a
    /// marker newtype; an absent URI is `none` inside the URI marker.
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Uuid(s) => serializer.serialize_newtype_struct(UUID_MARKER, s),
            // Sub-second precision is kept here; only the XML encoder drops it.
            Value::Date(d) => serializer.serialize_newtype_struct(
                DATE_MARKER,
                &d.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            ),
            Value::Uri(uri) => serializer.serialize_newtype_struct(URI_MARKER, &uri.as_deref()),
            Value::Binary(b) => serializer.serialize_newtype_struct(BINARY_MARKER, &BinaryBody(b)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}
