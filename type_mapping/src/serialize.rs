//! Serialization utilities
//!
//! This module provides conversions between `ModelValue`
//! and `serde_json` values.

use crate::types::{ModelValue, ValueMap};
use serde::Serialize;

/// Convert a JSON value into a `ModelValue`
///
/// Integral numbers become `Int`, other numbers `Float`; strings are kept verbatim.
pub fn from_json(value: serde_json::Value) -> ModelValue {
    match value {
        serde_json::Value::Null => ModelValue::Null,
        serde_json::Value::Bool(b) => ModelValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ModelValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                ModelValue::Float(f)
            } else {
                // u64 beyond i64 range
                ModelValue::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => ModelValue::String(s),
        serde_json::Value::Array(items) => {
            ModelValue::Array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => ModelValue::Map(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

/// Convert a `ModelValue` into a JSON value
pub fn to_json(value: &ModelValue) -> serde_json::Value {
    match value {
        ModelValue::Null => serde_json::Value::Null,
        ModelValue::Bool(b) => serde_json::Value::Bool(*b),
        ModelValue::Int(i) => serde_json::Value::from(*i),
        ModelValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ModelValue::String(s) => serde_json::Value::String(s.clone()),
        ModelValue::Uuid(id) => serde_json::Value::String(id.to_string()),
        ModelValue::Timestamp(ts) => serde_json::Value::String(ts.to_rfc3339()),
        ModelValue::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        ModelValue::Map(map) | ModelValue::Object { fields: map, .. } => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
    }
}

/// Convert serializable data into an ordered record of values
///
/// Returns `None` when the data does not serialize to a JSON object.
pub fn serialize_to_record<T: Serialize>(data: &T) -> Option<ValueMap> {
    match serde_json::to_value(data) {
        Ok(serde_json::Value::Object(map)) => Some(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
        _ => None,
    }
}
