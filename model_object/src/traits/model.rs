use crate::build_mode::BuildMode;
use crate::errors::{ModelError, ModelResult};
use crate::property::{PropertyCollection, PropertyDefinition};
use crate::record::IntoRecord;
use crate::registry::{self, ModelDefinitions};
use crate::relationship::{RecordRef, RelationshipDefinition, RelationshipValue};
use crate::state::ModelState;
use crate::traits::schema::ModelSchema;
use std::sync::Arc;
use type_mapping::{coerce_to_any, to_json, ModelValue, ValueMap};

/// Active-record behaviour shared by every model type
///
/// Implementors only provide `ModelSchema` (usually derived); the hooks
/// below are optional overrides.
pub trait Model: ModelSchema {
    /// Programmatic definitions, merged over the declared ones
    fn property_definitions() -> ModelResult<Vec<(String, PropertyDefinition)>> {
        Ok(Vec::new())
    }

    fn relationships() -> ModelResult<Vec<(String, RelationshipDefinition)>> {
        Ok(Vec::new())
    }

    /// Runs last during construction
    fn after_construct(&mut self) -> ModelResult<()> {
        Ok(())
    }

    /// Merged, locked definitions of this type, built once per process
    fn definitions() -> ModelResult<Arc<ModelDefinitions>> {
        registry::definitions_for::<Self>()
    }

    /// Construct an instance from attributes
    ///
    /// Fails on attributes without a definition and on `required`
    /// properties absent from the attributes.
    fn new<R: IntoRecord>(attributes: R) -> ModelResult<Self> {
        let attributes = attributes.into_record()?;
        let definitions = Self::definitions()?;

        let extra = extra_keys(definitions.properties().keys(), &attributes);
        if !extra.is_empty() {
            return Err(ModelError::extra_keys(Self::model_name(), extra));
        }

        let missing: Vec<String> = definitions
            .properties()
            .iter()
            .filter(|(key, definition)| definition.is_required() && !attributes.contains_key(*key))
            .map(|(key, _)| key.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::missing_keys(Self::model_name(), missing));
        }

        let properties =
            PropertyCollection::from_property_definitions(definitions.properties(), &attributes)?;
        let mut model = Self::from_state(ModelState::new(properties));
        model.after_construct()?;
        Ok(model)
    }

    /// Build an instance from row-shaped data
    ///
    /// Values not matching their definition go through the custom cast, then
    /// the built-in coercion for the declared types. A model whose primary key
    /// holds a value comes back clean, as if just loaded.
    fn from_data<R: IntoRecord>(data: R, mode: BuildMode) -> ModelResult<Self> {
        let data = data.into_record()?;
        let definitions = Self::definitions()?;
        let properties = definitions.properties();

        let extra = if mode.ignores_extra() {
            Vec::new()
        } else {
            extra_keys(properties.keys(), &data)
        };
        let missing: Vec<String> = if mode.ignores_missing() {
            Vec::new()
        } else {
            properties
                .iter()
                .filter(|(key, definition)| !data.contains_key(*key) && !definition.has_default())
                .map(|(key, _)| key.clone())
                .collect()
        };
        if !missing.is_empty() || !extra.is_empty() {
            return Err(ModelError::mismatched_keys(Self::model_name(), missing, extra));
        }

        let mut attributes = ValueMap::with_capacity(data.len());
        for (key, raw) in data {
            if let Some(definition) = properties.get(&key) {
                let value = cast_raw_value(&key, definition, raw)?;
                attributes.insert(key, value);
            }
        }

        crate::trace_log!(
            "Building {} from data ({} attributes, mode {})",
            Self::model_name(),
            attributes.len(),
            mode
        );

        let mut model = Self::new(attributes)?;
        if model.primary_value().is_some() {
            model.commit_changes();
        }
        Ok(model)
    }

    /// Assign every attribute of a record
    fn fill<R: IntoRecord>(&mut self, attributes: R) -> ModelResult<&mut Self> {
        let attributes = attributes.into_record()?;
        self.set_attributes(attributes)?;
        Ok(self)
    }

    /// Current value; `None` when the property is unset
    fn get_attribute(&self, key: &str) -> ModelResult<Option<&ModelValue>> {
        Ok(self.state().properties().get_or_fail(key)?.value())
    }

    fn set_attribute(&mut self, key: &str, value: impl Into<ModelValue>) -> ModelResult<()> {
        self.state_mut()
            .properties_mut()
            .get_mut_or_fail(key)?
            .set_value(value)
    }

    /// Assign in order; see `PropertyCollection::set_values`
    fn set_attributes<I, K, V>(&mut self, values: I) -> ModelResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ModelValue>,
    {
        self.state_mut().properties_mut().set_values(values)
    }

    fn unset_attribute(&mut self, key: &str) -> ModelResult<()> {
        self.state_mut().properties_mut().unset_property(key)
    }

    /// Current values of the dirty properties that hold a value
    fn get_dirty(&self) -> ValueMap {
        self.state().properties().get_dirty_values()
    }

    fn get_original(&self, key: &str) -> ModelResult<Option<&ModelValue>> {
        Ok(self.state().properties().get_or_fail(key)?.original_value())
    }

    fn get_originals(&self) -> ValueMap {
        self.state().properties().get_original_values()
    }

    fn is_dirty(&self) -> bool {
        self.state().properties().is_dirty()
    }

    /// Whether one property is dirty; unknown keys are never dirty
    fn is_attribute_dirty(&self, key: &str) -> bool {
        self.state()
            .properties()
            .get(key)
            .is_some_and(|property| property.is_dirty())
    }

    fn is_clean(&self) -> bool {
        !self.is_dirty()
    }

    fn is_set(&self, key: &str) -> bool {
        self.state().properties().is_set(key)
    }

    fn commit_changes(&mut self) {
        self.state_mut().properties_mut().commit_changed_properties();
    }

    fn sync_original(&mut self) {
        self.commit_changes();
    }

    fn revert_changes(&mut self) {
        self.state_mut().properties_mut().revert_changed_properties();
    }

    fn revert_change(&mut self, key: &str) -> ModelResult<()> {
        self.state_mut().properties_mut().revert_property(key)
    }

    /// Current values of every set property, in declaration order
    fn to_map(&self) -> ValueMap {
        self.state().properties().get_values()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.to_map()
                .iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        )
    }

    fn property_keys(&self) -> Vec<&str> {
        self.state().properties().keys().collect()
    }

    fn has_property(&self, key: &str) -> bool {
        self.state().properties().has(key)
    }

    /// Whether `value` would be accepted by the definition of `key`, before casting
    fn is_property_type_valid(&self, key: &str, value: &ModelValue) -> ModelResult<bool> {
        Ok(self
            .state()
            .properties()
            .get_or_fail(key)?
            .definition()
            .is_valid_value(value))
    }

    /// Primary key value, when set and not null
    fn primary_value(&self) -> Option<&ModelValue> {
        let key = Self::primary_key()?;
        self.state()
            .properties()
            .get(key)
            .and_then(|property| property.value())
            .filter(|value| !value.is_null())
    }

    /// Loaded value of a relationship, running its loader on first access
    fn relationship(&mut self, name: &str) -> ModelResult<RelationshipValue> {
        let definitions = Self::definitions()?;
        let definition = definitions
            .relationship(name)
            .ok_or_else(|| ModelError::unknown_relationship(name))?;

        if let Some(value) = self.state().relationships().get(name) {
            return Ok(value.clone());
        }

        let value = definition.load(name, self.state().properties())?;
        crate::debug_log!(
            "Loaded relationship {}.{} ({})",
            Self::model_name(),
            name,
            value.shape_name()
        );
        self.state_mut()
            .relationships_mut()
            .set(name, value.clone());
        Ok(value)
    }

    /// Single related record, resolving lazy references
    fn related_one<R: Model>(&mut self, name: &str) -> ModelResult<Option<Arc<R>>> {
        let record = match self.relationship(name)? {
            RelationshipValue::Empty => None,
            RelationshipValue::One(record) => Some(record),
            RelationshipValue::Lazy(reference) => {
                let resolved = reference.resolve()?;
                let cached = match &resolved {
                    Some(record) => RelationshipValue::One(Arc::clone(record)),
                    None => RelationshipValue::Empty,
                };
                self.state_mut().relationships_mut().set(name, cached);
                resolved
            }
            RelationshipValue::Many(_) => {
                return Err(ModelError::invalid_argument(
                    format!("Relationship {} holds a list of records", name),
                    vec![name.to_string()],
                ))
            }
        };
        record.map(|record| downcast_record::<R>(name, record)).transpose()
    }

    fn related_many<R: Model>(&mut self, name: &str) -> ModelResult<Vec<Arc<R>>> {
        match self.relationship(name)? {
            RelationshipValue::Empty => Ok(Vec::new()),
            RelationshipValue::Many(records) => records
                .into_iter()
                .map(|record| downcast_record::<R>(name, record))
                .collect(),
            other => Err(ModelError::invalid_argument(
                format!("Relationship {} holds {}", name, other.shape_name()),
                vec![name.to_string()],
            )),
        }
    }

    /// Store an already loaded value, bypassing the loader
    fn set_relationship(&mut self, name: &str, value: RelationshipValue) -> ModelResult<()> {
        let definitions = Self::definitions()?;
        let definition = definitions
            .relationship(name)
            .ok_or_else(|| ModelError::unknown_relationship(name))?;
        definition.check_shape(name, &value)?;
        self.state_mut().relationships_mut().set(name, value);
        Ok(())
    }

    fn is_relationship_loaded(&self, name: &str) -> bool {
        self.state().relationships().is_loaded(name)
    }

    fn purge_relationship(&mut self, name: &str) -> bool {
        self.state_mut().relationships_mut().purge(name)
    }

    fn purge_relationships(&mut self) {
        self.state_mut().relationships_mut().purge_all();
    }
}

fn extra_keys<'a>(known: impl Iterator<Item = &'a String>, data: &ValueMap) -> Vec<String> {
    let known: Vec<&String> = known.collect();
    data.keys()
        .filter(|key| !known.contains(key))
        .cloned()
        .collect()
}

/// Bring a raw value in line with its definition, or fail naming the key
fn cast_raw_value(key: &str, definition: &PropertyDefinition, raw: ModelValue) -> ModelResult<ModelValue> {
    if definition.is_valid_value(&raw) {
        return Ok(raw);
    }
    if definition.can_cast() {
        let actual = raw.kind_name().to_string();
        let cast = definition.cast(raw)?;
        if definition.is_valid_value(&cast) {
            return Ok(cast);
        }
        return Err(unexpected_type(key, definition, &actual));
    }
    if !raw.is_null() {
        if let Some(value) = coerce_to_any(&raw, definition.types_list()) {
            return Ok(value);
        }
    }
    Err(unexpected_type(key, definition, raw.kind_name()))
}

fn unexpected_type(key: &str, definition: &PropertyDefinition, actual: &str) -> ModelError {
    ModelError::invalid_argument(
        format!(
            "Property {} has an unexpected type: expected {}, got {}",
            key,
            definition.type_names(),
            actual
        ),
        vec![key.to_string()],
    )
}

fn downcast_record<R: Model>(name: &str, record: RecordRef) -> ModelResult<Arc<R>> {
    let actual = record.record_name();
    record.into_any().downcast::<R>().map_err(|_| {
        ModelError::invalid_argument(
            format!(
                "Relationship {} holds {} records, not {}",
                name,
                actual,
                R::model_name()
            ),
            vec![name.to_string()],
        )
    })
}
