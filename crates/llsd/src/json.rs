//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON has fewer kinds than LLSD, so `to_json` is lossy: dates, UUIDs and
//! URIs become strings, binary becomes base64 text, and both `Undefined`
//! and an absent URI become `null`.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::text;
use crate::value::{Map, Value};

pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Undefined | Value::Uri(None) => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::Number((*i).into()),
        // Non-finite reals have no JSON form.
        Value::Real(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) | Value::Uuid(s) | Value::Uri(Some(s)) => JsonValue::String(s.clone()),
        Value::Date(d) => JsonValue::String(text::render_date(d)),
        Value::Binary(b) => JsonValue::String(text::render_binary(b)),
        Value::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect::<JsonMap<String, JsonValue>>(),
        ),
    }
}

pub fn from_json(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Undefined,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Real(n.as_f64().unwrap_or(0.0)),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(from_json).collect()),
        JsonValue::Object(obj) => Value::Map(
            obj.iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect::<Map>(),
        ),
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        from_json(&value)
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        to_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_to_value() {
        let v = from_json(&json!({
            "a": [1, -2.5, true, null, "x"],
            "big": 18446744073709551615u64,
        }));
        let expected: Value = [
            (
                "a",
                Value::Array(vec![
                    Value::Integer(1),
                    Value::Real(-2.5),
                    Value::Boolean(true),
                    Value::Undefined,
                    Value::from("x"),
                ]),
            ),
            ("big", Value::Real(18446744073709551615u64 as f64)),
        ]
        .into_iter()
        .collect();
        assert_eq!(v, expected);
    }

    #[test]
    fn value_to_json_is_lossy_for_typed_scalars() {
        let v = Value::Array(vec![
            Value::nil_uuid(),
            Value::epoch(),
            Value::Uri(None),
            Value::Binary(b"hi".to_vec()),
            Value::Real(f64::NAN),
        ]);
        assert_eq!(
            to_json(&v),
            json!([
                "00000000-0000-0000-0000-000000000000",
                "1970-01-01T00:00:00Z",
                null,
                "aGk=",
                null
            ])
        );
    }

    #[test]
    fn object_order_survives() {
        let v = from_json(&json!({"z": 1, "a": 2}));
        assert_eq!(serde_json::to_string(&to_json(&v)).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
