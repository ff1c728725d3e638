use crate::errors::{ModelError, ModelResult};
use crate::property::definition::PropertyDefinition;
use std::sync::Arc;
use type_mapping::ModelValue;

/// Live attribute slot of one model instance
///
/// `None` means the property was never set; `Some(ModelValue::Null)` is an
/// explicit null and counts as set.
#[derive(Debug, Clone)]
pub struct Property {
    key: String,
    definition: Arc<PropertyDefinition>,
    value: Option<ModelValue>,
    original: Option<ModelValue>,
}

impl Property {
    /// Create a property; an explicit initial value wins over the default
    pub fn new(
        key: impl Into<String>,
        definition: Arc<PropertyDefinition>,
        initial: Option<ModelValue>,
    ) -> ModelResult<Self> {
        let key = key.into();
        let value = match initial.or_else(|| definition.get_default()) {
            Some(value) => Some(Self::checked(&key, &definition, value)?),
            None => None,
        };
        Ok(Self {
            key,
            definition,
            original: value.clone(),
            value,
        })
    }

    /// Validate a value, offering it to the cast fn when it does not fit
    fn checked(key: &str, definition: &PropertyDefinition, value: ModelValue) -> ModelResult<ModelValue> {
        if definition.is_valid_value(&value) {
            return Ok(value);
        }
        if definition.can_cast() {
            let actual = value.kind_name().to_string();
            let cast = definition.cast(value)?;
            if definition.is_valid_value(&cast) {
                return Ok(cast);
            }
            return Err(ModelError::invalid_value(key, &definition.type_names(), &actual));
        }
        Err(ModelError::invalid_value(
            key,
            &definition.type_names(),
            value.kind_name(),
        ))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn definition(&self) -> &Arc<PropertyDefinition> {
        &self.definition
    }

    pub fn value(&self) -> Option<&ModelValue> {
        self.value.as_ref()
    }

    pub fn original_value(&self) -> Option<&ModelValue> {
        self.original.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.value != self.original
    }

    pub fn is_clean(&self) -> bool {
        !self.is_dirty()
    }

    pub fn set_value(&mut self, value: impl Into<ModelValue>) -> ModelResult<()> {
        if self.definition.is_readonly() {
            return Err(ModelError::read_only(&self.key));
        }
        let value = Self::checked(&self.key, &self.definition, value.into())?;
        self.value = Some(value);
        Ok(())
    }

    /// Make the current value the new original
    pub fn commit_changes(&mut self) {
        self.original = self.value.clone();
    }

    /// Restore the original value
    pub fn revert_changes(&mut self) {
        self.value = self.original.clone();
    }

    pub fn unset(&mut self) -> ModelResult<()> {
        if self.definition.is_readonly() {
            return Err(ModelError::read_only(&self.key));
        }
        self.value = None;
        Ok(())
    }
}
