//! Model Object - Core active-record layer for modelhaus
//!
//! This crate provides property definitions, change-tracked properties,
//! the model traits, build modes, relationships and the repository/query
//! contracts used for persistence.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod build_mode;
pub mod errors;
pub mod generic_store;
pub mod id_type;
pub mod prelude;
pub mod property;
pub mod query_builder;
pub mod record;
pub mod registry;
pub mod relationship;
pub mod state;
pub mod traits;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use build_mode::BuildMode;
pub use errors::{
    has_error_factory, set_error_factory, ErrorFactory, ErrorKind, ErrorSource, ModelError,
    ModelResult,
};
pub use generic_store::MemoryRepository;
pub use id_type::UniversalId;
pub use property::{
    Property, PropertyCollection, PropertyDeclaration, PropertyDefault, PropertyDefinition,
    PropertyDefinitions,
};
pub use query_builder::{ModelQuery, QueryExecutor, RowSet, SortOrder};
pub use record::{record_from, IntoRecord, Record};
pub use registry::ModelDefinitions;
pub use relationship::{
    LazyReference, RecordRef, RelationshipCollection, RelationshipDefinition, RelationshipKind,
    RelationshipValue,
};
pub use state::ModelState;
pub use traits::{Model, ModelRecord, ModelSchema, PersistableModel, Repository};
pub use validation::{ValidatedModelName, ValidatedPropertyKey, ValidationError};

// Value types used throughout the public API and by generated code
pub use type_mapping::{ModelValue, TypeTag, ValueMap};
