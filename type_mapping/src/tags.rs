//! Type tag definitions
//!
//! This module maps the type names used in property declarations
//! to a closed set of tags and checks runtime values against them.

use crate::types::ModelValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepted runtime kind of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Int,
    Float,
    String,
    Bool,
    Array,
    Map,
    Uuid,
    DateTime,
    /// Any named object value
    Object,
    /// Any non-null value
    Mixed,
    /// Named object kind, matched by class name
    Named(String),
}

impl TypeTag {
    /// Map a declared type name to its tag
    pub fn parse(name: &str) -> TypeTag {
        // Normalize type string by removing all whitespace for consistent matching
        let normalized = name.replace(' ', "");
        match normalized.to_ascii_lowercase().as_str() {
            "int" | "integer" | "i64" | "i32" => TypeTag::Int,
            "float" | "double" | "f64" | "f32" => TypeTag::Float,
            "string" | "str" => TypeTag::String,
            "bool" | "boolean" => TypeTag::Bool,
            "array" | "vec" | "list" => TypeTag::Array,
            "map" => TypeTag::Map,
            "uuid" => TypeTag::Uuid,
            "datetime" | "timestamp" => TypeTag::DateTime,
            "object" => TypeTag::Object,
            "mixed" => TypeTag::Mixed,
            _ => TypeTag::Named(normalized),
        }
    }

    /// Whether a non-null value is of this kind
    pub fn matches(&self, value: &ModelValue) -> bool {
        match (self, value) {
            (_, ModelValue::Null) => false,
            (TypeTag::Mixed, _) => true,
            (TypeTag::Int, ModelValue::Int(_)) => true,
            (TypeTag::Float, ModelValue::Float(_)) => true,
            (TypeTag::String, ModelValue::String(_)) => true,
            (TypeTag::Bool, ModelValue::Bool(_)) => true,
            (TypeTag::Array, ModelValue::Array(_)) => true,
            (TypeTag::Map, ModelValue::Map(_)) => true,
            (TypeTag::Uuid, ModelValue::Uuid(_)) => true,
            (TypeTag::DateTime, ModelValue::Timestamp(_)) => true,
            (TypeTag::Object, ModelValue::Object { .. }) => true,
            (TypeTag::Named(name), ModelValue::Object { class, .. }) => name == class,
            _ => false,
        }
    }

    /// Whether the tag names one of the scalar kinds with built-in coercion
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeTag::Int | TypeTag::Float | TypeTag::String | TypeTag::Bool
        )
    }

    pub fn name(&self) -> &str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::String => "string",
            TypeTag::Bool => "bool",
            TypeTag::Array => "array",
            TypeTag::Map => "map",
            TypeTag::Uuid => "uuid",
            TypeTag::DateTime => "datetime",
            TypeTag::Object => "object",
            TypeTag::Mixed => "mixed",
            TypeTag::Named(name) => name.as_str(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypeTag::parse(s))
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        TypeTag::parse(name)
    }
}
