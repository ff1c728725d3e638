use crate::errors::{ModelError, ModelResult};
use crate::property::PropertyCollection;
use crate::relationship::value::RelationshipValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Fetches the related records of one instance, given its properties
pub type RelationshipLoader =
    Arc<dyn Fn(&PropertyCollection) -> ModelResult<RelationshipValue> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    HasOne,
    HasMany,
    BelongsTo,
    BelongsToMany,
    ManyToMany,
}

impl RelationshipKind {
    /// Whether the relationship resolves to at most one record
    pub fn is_single(&self) -> bool {
        matches!(self, RelationshipKind::HasOne | RelationshipKind::BelongsTo)
    }

    /// Whether a loaded value has a shape this kind can hold
    pub fn accepts(&self, value: &RelationshipValue) -> bool {
        match value {
            RelationshipValue::Empty => true,
            RelationshipValue::One(_) | RelationshipValue::Lazy(_) => self.is_single(),
            RelationshipValue::Many(_) => !self.is_single(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::HasOne => "has_one",
            RelationshipKind::HasMany => "has_many",
            RelationshipKind::BelongsTo => "belongs_to",
            RelationshipKind::BelongsToMany => "belongs_to_many",
            RelationshipKind::ManyToMany => "many_to_many",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared relationship of a model type
#[derive(Clone)]
pub struct RelationshipDefinition {
    kind: RelationshipKind,
    loader: Option<RelationshipLoader>,
    locked: bool,
}

impl fmt::Debug for RelationshipDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipDefinition")
            .field("kind", &self.kind)
            .field("has_loader", &self.loader.is_some())
            .field("locked", &self.locked)
            .finish()
    }
}

impl RelationshipDefinition {
    pub fn new(kind: RelationshipKind) -> Self {
        Self {
            kind,
            loader: None,
            locked: false,
        }
    }

    fn check_lock(&self) -> ModelResult<()> {
        if self.locked {
            return Err(ModelError::locked("Relationship definition"));
        }
        Ok(())
    }

    pub fn kind(mut self, kind: RelationshipKind) -> ModelResult<Self> {
        self.check_lock()?;
        self.kind = kind;
        Ok(self)
    }

    pub fn loader<F>(mut self, loader: F) -> ModelResult<Self>
    where
        F: Fn(&PropertyCollection) -> ModelResult<RelationshipValue> + Send + Sync + 'static,
    {
        self.check_lock()?;
        self.loader = Some(Arc::new(loader));
        Ok(self)
    }

    pub fn lock(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn get_kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    /// Run the loader for `name` and check the shape of what it returns
    pub fn load(&self, name: &str, properties: &PropertyCollection) -> ModelResult<RelationshipValue> {
        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| ModelError::missing_capability(name, "loader"))?;
        let value = loader(properties)?;
        self.check_shape(name, &value)?;
        Ok(value)
    }

    /// Reject values whose shape does not fit the relationship kind
    pub fn check_shape(&self, name: &str, value: &RelationshipValue) -> ModelResult<()> {
        if self.kind.accepts(value) {
            return Ok(());
        }
        Err(ModelError::invalid_argument(
            format!(
                "Relationship {} is {} and cannot hold {}",
                name,
                self.kind,
                value.shape_name()
            ),
            vec![name.to_string()],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_shapes() {
        assert!(RelationshipKind::HasOne.accepts(&RelationshipValue::Empty));
        assert!(!RelationshipKind::HasOne.accepts(&RelationshipValue::Many(Vec::new())));
        assert!(RelationshipKind::ManyToMany.accepts(&RelationshipValue::Many(Vec::new())));
        assert!(RelationshipKind::BelongsTo.is_single());
        assert!(!RelationshipKind::BelongsToMany.is_single());
        assert_eq!(RelationshipKind::BelongsToMany.to_string(), "belongs_to_many");
    }

    #[test]
    fn test_locked_definition_rejects_mutation() {
        let definition = RelationshipDefinition::new(RelationshipKind::HasMany).lock();
        assert!(definition.clone().kind(RelationshipKind::HasOne).unwrap_err().is_locked());
        assert!(definition
            .loader(|_| Ok(RelationshipValue::Empty))
            .unwrap_err()
            .is_locked());
    }

    #[test]
    fn test_load_without_loader_is_missing_capability() {
        let definition = RelationshipDefinition::new(RelationshipKind::HasOne).lock();
        let err = definition.load("owner", &PropertyCollection::default()).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::MissingCapability);
    }

    #[test]
    fn test_load_checks_shape() {
        let definition = RelationshipDefinition::new(RelationshipKind::HasOne)
            .loader(|_| Ok(RelationshipValue::Many(Vec::new())))
            .unwrap()
            .lock();
        let err = definition.load("owner", &PropertyCollection::default()).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.keys(), vec!["owner"]);
    }
}
