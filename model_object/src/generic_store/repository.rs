//! Repository implementation for the in-memory store

use super::core::MemoryRepository;
use crate::build_mode::BuildMode;
use crate::errors::{ModelError, ModelResult};
use crate::id_type::UniversalId;
use crate::property::PropertyDefinition;
use crate::query_builder::{ModelQuery, RowSet};
use crate::traits::{Model, Repository};
use signal_system::{EventType, ModelEvent};
use std::sync::PoisonError;
use type_mapping::{coerce_to_any, ModelValue, TypeTag};
use uuid::Uuid;

/// Stored records may predate schema changes
const STORED_MODE: BuildMode = BuildMode::from_bits_truncate(
    BuildMode::IGNORE_MISSING.bits() | BuildMode::IGNORE_EXTRA.bits(),
);

fn primary_key<M: Model>() -> ModelResult<&'static str> {
    M::primary_key().ok_or_else(|| ModelError::missing_capability(M::model_name(), "primary key"))
}

/// Primary key of a persisted instance
fn identify<M: Model>(model: &M) -> ModelResult<Option<UniversalId>> {
    match model.primary_value() {
        None => Ok(None),
        Some(value) => UniversalId::from_value(value).map(Some).ok_or_else(|| {
            ModelError::Persistence(format!(
                "{} has an unusable primary key value: {}",
                M::model_name(),
                value
            ))
        }),
    }
}

impl<M: Model> MemoryRepository<M> {
    /// Next id in the kind accepted by the primary key definition
    fn generate_id(&self, definition: &PropertyDefinition) -> ModelResult<UniversalId> {
        let types = definition.types_list();
        if types.contains(&TypeTag::Uuid) && !types.contains(&TypeTag::Int) {
            return Ok(UniversalId::Uuid(Uuid::new_v4()));
        }
        let next = ModelValue::Int(self.allocate_id());
        coerce_to_any(&next, types)
            .as_ref()
            .and_then(UniversalId::from_value)
            .ok_or_else(|| {
                ModelError::Persistence(format!(
                    "Cannot generate a {} primary key for {}",
                    definition.type_names(),
                    M::model_name()
                ))
            })
    }
}

impl<M: Model> Repository<M> for MemoryRepository<M> {
    fn insert(&self, model: M) -> ModelResult<M> {
        let key = primary_key::<M>()?;
        let mut record = model.to_map();

        let id = match identify(&model)? {
            Some(id) => id,
            None => {
                let definitions = M::definitions()?;
                let definition = definitions
                    .property(key)
                    .ok_or_else(|| ModelError::missing_capability(M::model_name(), "primary key property"))?;
                let id = self.generate_id(definition)?;
                record.insert(key.to_string(), id.to_value());
                id
            }
        };

        let stored = M::from_data(record.clone(), STORED_MODE)?;
        {
            let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
            if rows.contains_key(&id) {
                return Err(ModelError::Persistence(format!(
                    "{} {} already exists",
                    M::model_name(),
                    id
                )));
            }
            self.observe_id(&id);
            rows.insert(id.clone(), record.clone());
        }

        crate::debug_log!("Inserted {} {}", M::model_name(), id);
        self.emit_signal(
            ModelEvent::new(EventType::Created, M::model_name())
                .with_record_id(id.to_string())
                .with_record(&record),
        );
        Ok(stored)
    }

    fn update(&self, model: M) -> ModelResult<M> {
        let id = identify(&model)?.ok_or_else(|| {
            ModelError::Persistence(format!(
                "Cannot update {} without a primary key",
                M::model_name()
            ))
        })?;

        {
            let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
            match rows.get_mut(&id) {
                Some(row) => *row = model.to_map(),
                None => {
                    return Err(ModelError::Persistence(format!(
                        "{} {} does not exist",
                        M::model_name(),
                        id
                    )))
                }
            }
        }

        crate::debug_log!("Updated {} {}", M::model_name(), id);
        self.emit_signal(
            ModelEvent::new(EventType::Updated, M::model_name())
                .with_record_id(id.to_string())
                .with_record(&model.get_dirty()),
        );
        Ok(model)
    }

    fn delete(&self, model: &M) -> ModelResult<bool> {
        let Some(id) = identify(model)? else {
            return Ok(false);
        };

        let removed = {
            let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
            rows.shift_remove(&id)
        };

        match removed {
            Some(record) => {
                crate::debug_log!("Deleted {} {}", M::model_name(), id);
                self.emit_signal(
                    ModelEvent::new(EventType::Deleted, M::model_name())
                        .with_record_id(id.to_string())
                        .with_record(&record),
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn prepare_query(&self) -> ModelQuery<M> {
        ModelQuery::new(RowSet::new(self.records())).build_mode(STORED_MODE)
    }
}
