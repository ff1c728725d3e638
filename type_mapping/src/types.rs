//! Runtime value definitions
//!
//! This module provides the value type held by model attributes
//! and the conversions from plain Rust types.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ordered string-keyed map of values
pub type ValueMap = IndexMap<String, ModelValue>;

/// Runtime value of a model attribute
///
/// Deserialization never yields `Uuid` or `Timestamp`: strings stay strings
/// until a definition coerces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Array(Vec<ModelValue>),
    /// Named object kind, matched against `TypeTag::Named` by class name
    Object { class: String, fields: ValueMap },
    Map(ValueMap),
}

impl ModelValue {
    /// Build a named object value
    pub fn object(class: impl Into<String>, fields: ValueMap) -> Self {
        ModelValue::Object {
            class: class.into(),
            fields,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ModelValue::Null)
    }

    /// Short name of the runtime kind, used in error messages
    pub fn kind_name(&self) -> &str {
        match self {
            ModelValue::Null => "null",
            ModelValue::Bool(_) => "bool",
            ModelValue::Int(_) => "int",
            ModelValue::Float(_) => "float",
            ModelValue::Uuid(_) => "uuid",
            ModelValue::Timestamp(_) => "datetime",
            ModelValue::String(_) => "string",
            ModelValue::Array(_) => "array",
            ModelValue::Object { class, .. } => class.as_str(),
            ModelValue::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ModelValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ModelValue::Float(f) => Some(*f),
            ModelValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ModelValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ModelValue]> {
        match self {
            ModelValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            ModelValue::Map(map) => Some(map),
            ModelValue::Object { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelValue::Null => write!(f, "null"),
            ModelValue::Bool(b) => write!(f, "{}", b),
            ModelValue::Int(i) => write!(f, "{}", i),
            ModelValue::Float(v) => write!(f, "{}", v),
            ModelValue::Uuid(id) => write!(f, "{}", id),
            ModelValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            ModelValue::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", crate::serialize::to_json(other)),
        }
    }
}

impl From<String> for ModelValue {
    fn from(val: String) -> Self {
        ModelValue::String(val)
    }
}

impl From<&str> for ModelValue {
    fn from(val: &str) -> Self {
        ModelValue::String(val.to_string())
    }
}

impl From<bool> for ModelValue {
    fn from(val: bool) -> Self {
        ModelValue::Bool(val)
    }
}

impl From<i32> for ModelValue {
    fn from(val: i32) -> Self {
        ModelValue::Int(val as i64)
    }
}

impl From<i64> for ModelValue {
    fn from(val: i64) -> Self {
        ModelValue::Int(val)
    }
}

impl From<u32> for ModelValue {
    fn from(val: u32) -> Self {
        ModelValue::Int(val as i64)
    }
}

impl From<f32> for ModelValue {
    fn from(val: f32) -> Self {
        ModelValue::Float(val as f64)
    }
}

impl From<f64> for ModelValue {
    fn from(val: f64) -> Self {
        ModelValue::Float(val)
    }
}

impl From<Uuid> for ModelValue {
    fn from(val: Uuid) -> Self {
        ModelValue::Uuid(val)
    }
}

impl From<DateTime<Utc>> for ModelValue {
    fn from(val: DateTime<Utc>) -> Self {
        ModelValue::Timestamp(val)
    }
}

impl From<ValueMap> for ModelValue {
    fn from(val: ValueMap) -> Self {
        ModelValue::Map(val)
    }
}

impl From<serde_json::Value> for ModelValue {
    fn from(val: serde_json::Value) -> Self {
        crate::serialize::from_json(val)
    }
}

impl<T> From<Vec<T>> for ModelValue
where
    T: Into<ModelValue>,
{
    fn from(val: Vec<T>) -> Self {
        ModelValue::Array(val.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for ModelValue
where
    T: Into<ModelValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => ModelValue::Null,
        }
    }
}
