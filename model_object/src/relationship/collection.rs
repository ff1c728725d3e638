use crate::relationship::value::RelationshipValue;
use indexmap::IndexMap;

/// Per-instance cache of loaded relationships
#[derive(Debug, Clone, Default)]
pub struct RelationshipCollection {
    loaded: IndexMap<String, RelationshipValue>,
}

impl RelationshipCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RelationshipValue> {
        self.loaded.get(name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: RelationshipValue) {
        self.loaded.insert(name.into(), value);
    }

    /// Drop one cached entry; returns whether it was loaded
    pub fn purge(&mut self, name: &str) -> bool {
        self.loaded.shift_remove(name).is_some()
    }

    pub fn purge_all(&mut self) {
        self.loaded.clear();
    }

    pub fn loaded_names(&self) -> impl Iterator<Item = &str> {
        self.loaded.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
