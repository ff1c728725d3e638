//! Convenience re-exports for common model-object usage

// Core traits
pub use crate::traits::{Model, ModelRecord, ModelSchema, PersistableModel, Repository};

// Error types
pub use crate::errors::{ErrorKind, ModelError, ModelResult};

// Definitions and state
pub use crate::build_mode::BuildMode;
pub use crate::property::{PropertyDeclaration, PropertyDefinition};
pub use crate::record::{IntoRecord, Record};
pub use crate::state::ModelState;

// Relationships
pub use crate::relationship::{
    LazyReference, RelationshipDefinition, RelationshipKind, RelationshipValue,
};

// Persistence
pub use crate::generic_store::MemoryRepository;
pub use crate::query_builder::{ModelQuery, QueryExecutor, RowSet, SortOrder};

// ID type
pub use crate::id_type::UniversalId;

// Values
pub use type_mapping::{ModelValue, TypeTag, ValueMap};

// Common external dependencies that are frequently used
pub use serde::{Deserialize, Serialize};
pub use uuid::Uuid;
