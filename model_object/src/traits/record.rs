use crate::traits::Model;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use type_mapping::{ModelValue, ValueMap};

/// Object-safe view of any model instance
///
/// Relationship caches hold related instances through this trait and
/// downcast back to the concrete model on access.
pub trait ModelRecord: Any + Send + Sync {
    fn record_name(&self) -> &'static str;

    /// Current values of every set property
    fn attributes(&self) -> ValueMap;

    /// Non-null primary key value
    fn record_id(&self) -> Option<ModelValue>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<M: Model> ModelRecord for M {
    fn record_name(&self) -> &'static str {
        M::model_name()
    }

    fn attributes(&self) -> ValueMap {
        self.to_map()
    }

    fn record_id(&self) -> Option<ModelValue> {
        self.primary_value().cloned()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl dyn ModelRecord {
    pub fn downcast_ref<M: Model>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    pub fn is<M: Model>(&self) -> bool {
        self.as_any().is::<M>()
    }
}

impl fmt::Debug for dyn ModelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.record_name())
            .field("attributes", &self.attributes())
            .finish()
    }
}
