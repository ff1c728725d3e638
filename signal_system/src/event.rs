//! Model event types and definitions
//!
//! This module defines the structure of model events
//! that flow through the signal system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::types::{ModelValue, ValueMap};

/// Model event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Created,
    Updated,
    Deleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Created => "created",
            EventType::Updated => "updated",
            EventType::Deleted => "deleted",
        }
    }
}

/// Model event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEvent {
    /// Unique event ID
    pub id: Uuid,
    /// Event type
    pub event_type: EventType,
    /// Name of the model type
    pub model: String,
    /// Hook name, namespaced by the configured prefix (`{prefix}_{model}_{event}`)
    pub hook: String,
    /// Primary key of the record (if available)
    pub record_id: Option<String>,
    /// Attribute payload
    pub payload: HashMap<String, ModelValue>,
    /// Event timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ModelEvent {
    pub fn new(event_type: EventType, model: impl Into<String>) -> Self {
        let model = model.into();
        let hook = config::hook_name(&format!("{}_{}", model, event_type.as_str()));
        Self {
            id: Uuid::new_v4(),
            event_type,
            model,
            hook,
            record_id: None,
            payload: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_record_id(mut self, record_id: String) -> Self {
        self.record_id = Some(record_id);
        self
    }

    /// Copy every attribute of a record into the payload
    pub fn with_record(mut self, record: &ValueMap) -> Self {
        for (key, value) in record {
            self.payload.insert(key.clone(), value.clone());
        }
        self
    }

    /// Payload as a JSON object, for handing to hosts that speak JSON
    pub fn payload_as_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.payload
                .iter()
                .map(|(key, value)| (key.clone(), type_mapping::to_json(value)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_hook_and_payload() {
        let mut record = ValueMap::new();
        record.insert("name".to_string(), ModelValue::from("Widget"));

        let event = ModelEvent::new(EventType::Created, "product")
            .with_record_id("7".to_string())
            .with_record(&record);

        // No prefix is installed in this test binary
        assert_eq!(event.hook, "product_created");
        assert_eq!(event.record_id.as_deref(), Some("7"));
        assert_eq!(event.payload_as_json()["name"], "Widget");
    }
}
