//! Lossy JSON rendering of values, for logs and test diagnostics.
//!
//! One-way only: the JSON shape is chosen for readability, not for
//! re-parsing. Binary data becomes base64 text, non-finite floats become
//! strings, and a map whose keys are not strings is rendered as an array of
//! `[key, value]` pairs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::value::Value;

/// Renders a value tree as `serde_json::Value`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::I32(n) => json!(n),
        Value::I64(n) => json!(n),
        Value::F64(f) => {
            if f.is_finite() {
                json!(f)
            } else {
                json!(f.to_string())
            }
        }
        Value::Str(s) => json!(s),
        Value::Bytes(b) => json!(STANDARD.encode(b)),
        Value::Seq(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Map(pairs) => {
            let all_string_keys = pairs.iter().all(|(k, _)| matches!(k, Value::Str(_)));
            if all_string_keys {
                let map = pairs
                    .iter()
                    .map(|(k, v)| {
                        let key = match k {
                            Value::Str(s) => s.clone(),
                            _ => unreachable!(),
                        };
                        (key, value_to_json(v))
                    })
                    .collect();
                serde_json::Value::Object(map)
            } else {
                serde_json::Value::Array(
                    pairs
                        .iter()
                        .map(|(k, v)| json!([value_to_json(k), value_to_json(v)]))
                        .collect(),
                )
            }
        }
        Value::Enum(n) => json!(n),
        Value::Record(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), value_to_json(v)))
                .collect(),
        ),
        Value::Union { variant, value } => json!({
            "$variant": variant,
            "value": value_to_json(value),
        }),
    }
}
