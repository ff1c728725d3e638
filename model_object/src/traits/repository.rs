use crate::errors::{ModelError, ModelResult};
use crate::query_builder::ModelQuery;
use crate::record::IntoRecord;
use crate::traits::model::Model;
use std::sync::Arc;
use type_mapping::ModelValue;

/// Persistence backend for one model type
pub trait Repository<M: Model>: Send + Sync {
    /// Persist a new instance, returning it as stored (ids assigned)
    fn insert(&self, model: M) -> ModelResult<M>;

    fn update(&self, model: M) -> ModelResult<M>;

    /// Remove the stored instance; `false` when nothing was stored
    fn delete(&self, model: &M) -> ModelResult<bool>;

    fn prepare_query(&self) -> ModelQuery<M>;
}

/// Model type bound to a repository
pub trait PersistableModel: Model {
    fn repository() -> Arc<dyn Repository<Self>>;

    fn query() -> ModelQuery<Self> {
        Self::repository().prepare_query()
    }

    /// Look up by primary key; absent records are `None`
    fn find(id: impl Into<ModelValue>) -> ModelResult<Option<Self>> {
        let key = Self::primary_key()
            .ok_or_else(|| ModelError::missing_capability(Self::model_name(), "primary key"))?;
        Self::query().where_eq(key, id).first()
    }

    fn create<R: IntoRecord>(attributes: R) -> ModelResult<Self> {
        Self::new(attributes)?.save()
    }

    /// Insert or update depending on whether the primary key is set
    ///
    /// `required_on_save` properties must be set. The returned instance is clean.
    fn save(self) -> ModelResult<Self> {
        let missing: Vec<String> = self
            .state()
            .properties()
            .get_required_on_save_properties()
            .iter()
            .filter(|property| !property.is_set())
            .map(|property| property.key().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::missing_keys(Self::model_name(), missing));
        }

        let repository = Self::repository();
        let mut saved = if self.primary_value().is_some() {
            repository.update(self)?
        } else {
            repository.insert(self)?
        };
        saved.commit_changes();
        Ok(saved)
    }

    fn delete(&self) -> ModelResult<bool> {
        Self::repository().delete(self)
    }
}
