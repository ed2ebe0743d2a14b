//! JSON conversion for field values and records.
//!
//! Bytes are base64 encoded, UUIDs are written as strings and timestamps as
//! RFC 3339 strings. Going the other way there is no type context, so JSON
//! strings stay strings until a schema coerces them.

use crate::record::Record;
use crate::values::FieldValue;
use base64::Engine;
use serde_json::json;

/// Convert a FieldValue to a JSON value.
pub fn field_value_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Null => serde_json::Value::Null,
        FieldValue::Bool(b) => json!(*b),
        FieldValue::Int32(i) => json!(*i),
        FieldValue::Int64(i) => json!(*i),
        FieldValue::Float64(f) => json!(*f),
        FieldValue::String(s) => json!(s),
        FieldValue::Bytes(b) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(b);
            json!(encoded)
        }
        FieldValue::Uuid(u) => json!(u.to_string()),
        FieldValue::DateTime(dt) => json!(dt.to_rfc3339()),
        FieldValue::Array(arr) => {
            json!(arr.iter().map(field_value_to_json).collect::<Vec<_>>())
        }
        FieldValue::Object(map) => {
            let mut obj = serde_json::Map::new();
            for (key, value) in map {
                obj.insert(key.clone(), field_value_to_json(value));
            }
            serde_json::Value::Object(obj)
        }
    }
}

/// Convert a JSON value to a FieldValue (without type context).
pub fn json_to_field_value(value: &serde_json::Value) -> FieldValue {
    match value {
        serde_json::Value::Null => FieldValue::Null,
        serde_json::Value::Bool(b) => FieldValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Int64(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float64(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => FieldValue::String(s.clone()),
        serde_json::Value::Array(arr) => {
            FieldValue::Array(arr.iter().map(json_to_field_value).collect())
        }
        serde_json::Value::Object(map) => FieldValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_field_value(v)))
                .collect(),
        ),
    }
}

/// Convert a complete record to a JSON object.
pub fn record_to_json<R: Record>(record: &R) -> serde_json::Map<String, serde_json::Value> {
    let mut obj = serde_json::Map::new();
    for name in record.field_names() {
        let value = record.get_field(name).unwrap_or(FieldValue::Null);
        obj.insert(name.to_string(), field_value_to_json(&value));
    }
    obj
}
