//! Built-in value coercion
//!
//! Scalar conversions applied when raw row data does not already
//! match a declared type and no custom cast is available.

use crate::serialize::from_json;
use crate::tags::TypeTag;
use crate::types::ModelValue;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Coerce a value into the given kind, if a built-in conversion exists
pub fn coerce_to(value: &ModelValue, tag: &TypeTag) -> Option<ModelValue> {
    if tag.matches(value) {
        return Some(value.clone());
    }

    match tag {
        TypeTag::Int => to_int(value).map(ModelValue::Int),
        TypeTag::Float => to_float(value).map(ModelValue::Float),
        TypeTag::String => to_string(value).map(ModelValue::String),
        TypeTag::Bool => to_bool(value).map(ModelValue::Bool),
        TypeTag::Array => to_array(value),
        TypeTag::Map => to_map(value),
        TypeTag::Uuid => match value {
            ModelValue::String(s) => Uuid::parse_str(s.trim()).ok().map(ModelValue::Uuid),
            _ => None,
        },
        TypeTag::DateTime => to_timestamp(value).map(ModelValue::Timestamp),
        TypeTag::Object | TypeTag::Mixed | TypeTag::Named(_) => None,
    }
}

/// Coerce a value into the first of the given kinds that accepts it
///
/// A value already matching any of the kinds is returned unchanged.
pub fn coerce_to_any(value: &ModelValue, tags: &[TypeTag]) -> Option<ModelValue> {
    if tags.iter().any(|tag| tag.matches(value)) {
        return Some(value.clone());
    }
    tags.iter().find_map(|tag| coerce_to(value, tag))
}

fn to_int(value: &ModelValue) -> Option<i64> {
    match value {
        ModelValue::Float(f) => float_to_int(*f),
        ModelValue::Bool(b) => Some(i64::from(*b)),
        ModelValue::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_int))
        }
        _ => None,
    }
}

/// Truncate toward zero; `None` when the result does not fit an `i64`
fn float_to_int(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn to_float(value: &ModelValue) -> Option<f64> {
    match value {
        ModelValue::Int(i) => Some(*i as f64),
        ModelValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        ModelValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn to_string(value: &ModelValue) -> Option<String> {
    match value {
        ModelValue::Int(i) => Some(i.to_string()),
        ModelValue::Float(f) => Some(f.to_string()),
        ModelValue::Bool(b) => Some(b.to_string()),
        ModelValue::Uuid(id) => Some(id.to_string()),
        ModelValue::Timestamp(ts) => Some(ts.to_rfc3339()),
        _ => None,
    }
}

fn to_bool(value: &ModelValue) -> Option<bool> {
    match value {
        ModelValue::Int(i) => Some(*i != 0),
        ModelValue::Float(f) => Some(*f != 0.0),
        ModelValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_array(value: &ModelValue) -> Option<ModelValue> {
    match value {
        // JSON-encoded columns
        ModelValue::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(json @ serde_json::Value::Array(_)) => Some(from_json(json)),
            _ => Some(ModelValue::Array(vec![value.clone()])),
        },
        ModelValue::Map(_) | ModelValue::Null => None,
        other => Some(ModelValue::Array(vec![other.clone()])),
    }
}

fn to_map(value: &ModelValue) -> Option<ModelValue> {
    match value {
        ModelValue::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(json @ serde_json::Value::Object(_)) => Some(from_json(json)),
            _ => None,
        },
        ModelValue::Object { fields, .. } => Some(ModelValue::Map(fields.clone())),
        _ => None,
    }
}

fn to_timestamp(value: &ModelValue) -> Option<DateTime<Utc>> {
    match value {
        ModelValue::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        ModelValue::Int(secs) => Utc.timestamp_opt(*secs, 0).single(),
        _ => None,
    }
}
