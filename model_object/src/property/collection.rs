use crate::errors::{ModelError, ModelResult};
use crate::property::definition::PropertyDefinition;
use crate::property::value::Property;
use crate::validation::ValidatedPropertyKey;
use indexmap::IndexMap;
use std::sync::Arc;
use type_mapping::{ModelValue, ValueMap};

/// Locked definitions of a model type, in declaration order
pub type PropertyDefinitions = IndexMap<String, Arc<PropertyDefinition>>;

/// Ordered set of the properties of one model instance
///
/// Membership is fixed at construction; only values change afterwards.
#[derive(Debug, Clone, Default)]
pub struct PropertyCollection {
    properties: IndexMap<String, Property>,
}

impl PropertyCollection {
    /// Build one property per definition, taking initial values from `initial`
    ///
    /// Keys of `initial` without a definition are ignored here; callers
    /// decide whether extra keys are an error.
    pub fn from_property_definitions(
        definitions: &PropertyDefinitions,
        initial: &ValueMap,
    ) -> ModelResult<Self> {
        let mut properties = IndexMap::with_capacity(definitions.len());
        for (key, definition) in definitions {
            let key = ValidatedPropertyKey::new(key)
                .map_err(|e| ModelError::invalid_argument(e.to_string(), vec![key.clone()]))?
                .into_string();
            let property = Property::new(key.clone(), Arc::clone(definition), initial.get(&key).cloned())?;
            properties.insert(key, property);
        }
        Ok(Self { properties })
    }

    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Whether the property exists and holds a value (null included)
    pub fn is_set(&self, key: &str) -> bool {
        self.properties.get(key).is_some_and(Property::is_set)
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn get_or_fail(&self, key: &str) -> ModelResult<&Property> {
        self.properties
            .get(key)
            .ok_or_else(|| ModelError::unknown_property(key))
    }

    pub fn get_mut_or_fail(&mut self, key: &str) -> ModelResult<&mut Property> {
        self.properties
            .get_mut(key)
            .ok_or_else(|| ModelError::unknown_property(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// Assign values in order
    ///
    /// Stops at the first failure; assignments made before it in the same
    /// call stay applied.
    pub fn set_values<I, K, V>(&mut self, values: I) -> ModelResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ModelValue>,
    {
        for (key, value) in values {
            self.get_mut_or_fail(key.as_ref())?.set_value(value)?;
        }
        Ok(())
    }

    /// Current values of every set property
    pub fn get_values(&self) -> ValueMap {
        self.properties
            .iter()
            .filter_map(|(key, property)| property.value().map(|v| (key.clone(), v.clone())))
            .collect()
    }

    /// Original values of every property that had one
    pub fn get_original_values(&self) -> ValueMap {
        self.properties
            .iter()
            .filter_map(|(key, property)| {
                property
                    .original_value()
                    .map(|v| (key.clone(), v.clone()))
            })
            .collect()
    }

    /// Current values of dirty properties that hold a value
    ///
    /// Dirty properties that were unset have no value to report; see
    /// `get_dirty_unset_keys`.
    pub fn get_dirty_values(&self) -> ValueMap {
        self.properties
            .iter()
            .filter(|(_, property)| property.is_dirty())
            .filter_map(|(key, property)| property.value().map(|v| (key.clone(), v.clone())))
            .collect()
    }

    /// Keys of dirty properties that are currently unset
    pub fn get_dirty_unset_keys(&self) -> Vec<&str> {
        self.properties
            .values()
            .filter(|p| p.is_dirty() && !p.is_set())
            .map(Property::key)
            .collect()
    }

    pub fn get_dirty_properties(&self) -> Vec<&Property> {
        self.properties.values().filter(|p| p.is_dirty()).collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.properties.values().any(Property::is_dirty)
    }

    pub fn is_property_dirty(&self, key: &str) -> ModelResult<bool> {
        Ok(self.get_or_fail(key)?.is_dirty())
    }

    pub fn commit_changed_properties(&mut self) {
        for property in self.properties.values_mut().filter(|p| p.is_dirty()) {
            property.commit_changes();
        }
    }

    pub fn revert_changed_properties(&mut self) {
        for property in self.properties.values_mut().filter(|p| p.is_dirty()) {
            property.revert_changes();
        }
    }

    pub fn revert_property(&mut self, key: &str) -> ModelResult<()> {
        self.get_mut_or_fail(key)?.revert_changes();
        Ok(())
    }

    pub fn unset_property(&mut self, key: &str) -> ModelResult<()> {
        self.get_mut_or_fail(key)?.unset()
    }

    pub fn get_required_properties(&self) -> PropertyCollection {
        self.subset(|p| p.definition().is_required())
    }

    pub fn get_required_on_save_properties(&self) -> PropertyCollection {
        self.subset(|p| p.definition().is_required_on_save())
    }

    /// Copy of the properties matching `predicate`, in declaration order
    pub fn subset<F>(&self, mut predicate: F) -> PropertyCollection
    where
        F: FnMut(&Property) -> bool,
    {
        let properties = self
            .properties
            .iter()
            .filter(|(_, property)| predicate(property))
            .map(|(key, property)| (key.clone(), property.clone()))
            .collect();
        Self { properties }
    }

    pub fn filter<F>(&self, mut predicate: F) -> Vec<&Property>
    where
        F: FnMut(&Property) -> bool,
    {
        self.properties.values().filter(|p| predicate(*p)).collect()
    }

    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&Property) -> T,
    {
        self.properties.values().map(f).collect()
    }

    pub fn reduce<T, F>(&self, init: T, f: F) -> T
    where
        F: FnMut(T, &Property) -> T,
    {
        self.properties.values().fold(init, f)
    }

    /// Run `f` on every property and return the collection for chaining
    pub fn tap<F>(&self, f: F) -> &Self
    where
        F: FnMut(&Property),
    {
        self.properties.values().for_each(f);
        self
    }

    pub fn count(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyCollection {
    type Item = &'a Property;
    type IntoIter = indexmap::map::Values<'a, String, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> PropertyDefinitions {
        let mut definitions = PropertyDefinitions::new();
        definitions.insert(
            "id".to_string(),
            Arc::new(PropertyDefinition::new().of_type("int").unwrap().nullable().unwrap().lock()),
        );
        definitions.insert(
            "name".to_string(),
            Arc::new(PropertyDefinition::new().required().unwrap().lock()),
        );
        definitions.insert(
            "price".to_string(),
            Arc::new(
                PropertyDefinition::new()
                    .of_type("float")
                    .unwrap()
                    .default_value(5.99)
                    .unwrap()
                    .required_on_save()
                    .unwrap()
                    .lock(),
            ),
        );
        definitions
    }

    fn collection() -> PropertyCollection {
        let mut initial = ValueMap::new();
        initial.insert("name".to_string(), "Widget".into());
        PropertyCollection::from_property_definitions(&definitions(), &initial).unwrap()
    }

    #[test]
    fn test_construction_follows_declaration_order() {
        let properties = collection();
        assert_eq!(properties.keys().collect::<Vec<_>>(), vec!["id", "name", "price"]);
        assert_eq!(properties.count(), 3);
        assert!(!properties.is_set("id"));
        assert!(properties.is_set("name"));
        assert_eq!(
            properties.get("price").and_then(Property::value),
            Some(&ModelValue::Float(5.99))
        );
        assert!(!properties.is_dirty());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let mut definitions = PropertyDefinitions::new();
        definitions.insert(String::new(), Arc::new(PropertyDefinition::new().lock()));
        let err = PropertyCollection::from_property_definitions(&definitions, &ValueMap::new())
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_unknown_key_message() {
        let properties = collection();
        let err = properties.get_or_fail("colour").unwrap_err();
        assert_eq!(err.to_string(), "Property colour does not exist");
    }

    #[test]
    fn test_set_values_keeps_earlier_assignments() {
        let mut properties = collection();
        let err = properties
            .set_values([("name", ModelValue::from("Gadget")), ("nope", ModelValue::Int(1))])
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.keys(), vec!["nope"]);
        assert_eq!(
            properties.get("name").and_then(Property::value),
            Some(&ModelValue::from("Gadget"))
        );

        let mut properties = collection();
        properties
            .set_values([("nope", ModelValue::Int(1)), ("name", ModelValue::from("Gadget"))])
            .unwrap_err();
        assert!(!properties.is_dirty());
    }

    #[test]
    fn test_dirty_views_and_commit() {
        let mut properties = collection();
        properties.set_values([("name", "Gadget")]).unwrap();
        properties.unset_property("price").unwrap();

        let dirty = properties.get_dirty_values();
        assert_eq!(dirty.get("name"), Some(&ModelValue::from("Gadget")));
        assert_eq!(dirty.get("price"), None);
        assert_eq!(properties.get_dirty_unset_keys(), vec!["price"]);
        assert_eq!(properties.get_dirty_properties().len(), 2);
        assert!(properties.is_property_dirty("name").unwrap());
        assert!(!properties.is_property_dirty("id").unwrap());

        let originals = properties.get_original_values();
        assert_eq!(originals.get("name"), Some(&ModelValue::from("Widget")));

        properties.commit_changed_properties();
        assert!(!properties.is_dirty());
        assert!(!properties.is_set("price"));
        assert_eq!(properties.get_values().len(), 1);
    }

    #[test]
    fn test_revert() {
        let mut properties = collection();
        properties.set_values([("name", "Gadget")]).unwrap();
        properties.set_values([("price", 1.5)]).unwrap();

        properties.revert_property("name").unwrap();
        assert!(!properties.is_property_dirty("name").unwrap());
        assert!(properties.is_dirty());

        properties.revert_changed_properties();
        assert!(!properties.is_dirty());
        assert!(properties.revert_property("nope").is_err());
    }

    #[test]
    fn test_required_filters_and_helpers() {
        let properties = collection();
        let required = properties.get_required_properties();
        assert_eq!(required.keys().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(
            required.get("name").and_then(Property::value),
            Some(&ModelValue::from("Widget"))
        );

        let on_save = properties.get_required_on_save_properties();
        assert_eq!(on_save.count(), 1);
        assert!(on_save.is_set("price"));
        assert!(!on_save.has("name"));

        let set_count = properties.reduce(0, |n, p| if p.is_set() { n + 1 } else { n });
        assert_eq!(set_count, 2);
        assert_eq!(properties.map(|p| p.key().len()), vec![2, 4, 5]);

        let mut seen = Vec::new();
        properties.tap(|p| seen.push(p.key().to_string()));
        assert_eq!(seen.len(), 3);
        assert!(!properties.is_empty());
    }
}
