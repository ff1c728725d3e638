//! Row-shaped input for `Model::from_data`

use crate::errors::{ModelError, ModelResult};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use type_mapping::{from_json, serialize_to_record, ModelValue, ValueMap};

/// Key to value map of one row
pub type Record = ValueMap;

/// Anything that can be read as a record
pub trait IntoRecord {
    fn into_record(self) -> ModelResult<Record>;
}

impl IntoRecord for ValueMap {
    fn into_record(self) -> ModelResult<Record> {
        Ok(self)
    }
}

impl IntoRecord for &ValueMap {
    fn into_record(self) -> ModelResult<Record> {
        Ok(self.clone())
    }
}

impl IntoRecord for HashMap<String, ModelValue> {
    fn into_record(self) -> ModelResult<Record> {
        Ok(self.into_iter().collect())
    }
}

impl IntoRecord for BTreeMap<String, ModelValue> {
    fn into_record(self) -> ModelResult<Record> {
        Ok(self.into_iter().collect())
    }
}

impl<K: Into<String>> IntoRecord for Vec<(K, ModelValue)> {
    fn into_record(self) -> ModelResult<Record> {
        Ok(self.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoRecord for serde_json::Map<String, serde_json::Value> {
    fn into_record(self) -> ModelResult<Record> {
        Ok(self.into_iter().map(|(k, v)| (k, from_json(v))).collect())
    }
}

impl IntoRecord for serde_json::Value {
    fn into_record(self) -> ModelResult<Record> {
        match self {
            serde_json::Value::Object(map) => map.into_record(),
            other => Err(ModelError::invalid_argument(
                format!("Cannot read a record from JSON {}", json_kind(&other)),
                Vec::new(),
            )),
        }
    }
}

impl IntoRecord for ModelValue {
    fn into_record(self) -> ModelResult<Record> {
        match self {
            ModelValue::Map(map) => Ok(map),
            ModelValue::Object { fields, .. } => Ok(fields),
            other => Err(ModelError::invalid_argument(
                format!("Cannot read a record from a {} value", other.kind_name()),
                Vec::new(),
            )),
        }
    }
}

/// Read the public fields of any serializable struct as a record
pub fn record_from<T: Serialize>(data: &T) -> ModelResult<Record> {
    serialize_to_record(data).ok_or_else(|| {
        ModelError::invalid_argument("Value does not serialize to a key/value record", Vec::new())
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        id: i64,
        name: String,
    }

    #[test]
    fn test_json_object_keeps_order() {
        let record = json!({"b": 1, "a": "x"}).into_record().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&ModelValue::Int(1)));
    }

    #[test]
    fn test_non_map_input_is_rejected() {
        assert!(json!([1, 2]).into_record().unwrap_err().is_invalid_argument());
        assert!(ModelValue::Int(3).into_record().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_struct_fields_become_record() {
        let record = record_from(&Row {
            id: 4,
            name: "Widget".to_string(),
        })
        .unwrap();
        assert_eq!(record.get("id"), Some(&ModelValue::Int(4)));
        assert_eq!(record.get("name"), Some(&ModelValue::from("Widget")));

        assert!(record_from(&5).is_err());
    }

    #[test]
    fn test_pairs() {
        let record = vec![("a", ModelValue::Int(1)), ("c", ModelValue::Int(2))]
            .into_record()
            .unwrap();
        assert_eq!(record.len(), 2);
    }
}
