//! Per-type definition registry
//!
//! Merged, locked definitions are built on the first use of a model type and
//! shared by every later instance for the lifetime of the process.

use crate::errors::{ModelError, ModelResult};
use crate::property::{PropertyDefinition, PropertyDefinitions};
use crate::relationship::RelationshipDefinition;
use crate::traits::Model;
use crate::validation::{ValidatedModelName, ValidatedPropertyKey};
use cache_system::{CacheSnapshot, TypeCache};
use indexmap::IndexMap;
use std::sync::{Arc, LazyLock};

/// Locked schema of one model type
#[derive(Debug)]
pub struct ModelDefinitions {
    model_name: &'static str,
    primary_key: Option<&'static str>,
    properties: PropertyDefinitions,
    relationships: IndexMap<String, Arc<RelationshipDefinition>>,
}

impl ModelDefinitions {
    /// Merge declared properties with the programmatic overrides of `M`
    ///
    /// Overrides win on key collisions and keep the declared position.
    pub fn build<M: Model>() -> ModelResult<Self> {
        let model_name = M::model_name();
        ValidatedModelName::new(model_name)
            .map_err(|e| ModelError::invalid_argument(e.to_string(), vec![model_name.to_string()]))?;

        let mut merged: IndexMap<String, PropertyDefinition> = IndexMap::new();
        for (key, declaration) in M::declared_properties()? {
            merged.insert(key, declaration.resolve()?);
        }
        for (key, definition) in M::property_definitions()? {
            merged.insert(key, definition);
        }

        let mut properties = PropertyDefinitions::with_capacity(merged.len());
        for (key, definition) in merged {
            let key = ValidatedPropertyKey::new(&key)
                .map_err(|e| ModelError::invalid_argument(e.to_string(), vec![key.clone()]))?
                .into_string();
            properties.insert(key, Arc::new(definition.lock()));
        }

        let relationships = M::relationships()?
            .into_iter()
            .map(|(name, definition)| (name, Arc::new(definition.lock())))
            .collect();

        crate::debug_log!(
            "Built definitions for {}: {} properties",
            model_name,
            properties.len()
        );

        Ok(Self {
            model_name,
            primary_key: M::primary_key(),
            properties,
            relationships,
        })
    }

    pub fn model_name(&self) -> &'static str {
        self.model_name
    }

    pub fn primary_key(&self) -> Option<&'static str> {
        self.primary_key
    }

    pub fn properties(&self) -> &PropertyDefinitions {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Arc<PropertyDefinition>> {
        self.properties.get(key)
    }

    pub fn relationships(&self) -> &IndexMap<String, Arc<RelationshipDefinition>> {
        &self.relationships
    }

    pub fn relationship(&self, name: &str) -> Option<&Arc<RelationshipDefinition>> {
        self.relationships.get(name)
    }
}

static DEFINITIONS: LazyLock<TypeCache<ModelDefinitions>> = LazyLock::new(TypeCache::new);

/// Definitions of `M`, built and cached on first use
pub fn definitions_for<M: Model>() -> ModelResult<Arc<ModelDefinitions>> {
    DEFINITIONS.get_or_try_insert_with::<M, ModelError, _>(ModelDefinitions::build::<M>)
}

/// Whether the definitions of `M` have been built
pub fn is_registered<M: Model>() -> bool {
    DEFINITIONS.contains::<M>()
}

/// Usage counters of the definition registry
pub fn registry_stats() -> CacheSnapshot {
    DEFINITIONS.stats()
}
