//! Relationship layer
//!
//! Relationships are declared per model type as name to
//! `RelationshipDefinition` entries. Each instance caches what the loaders
//! return in its `RelationshipCollection`; cached entries are shared
//! references to other model instances.

pub mod collection;
pub mod definition;
pub mod value;

pub use collection::RelationshipCollection;
pub use definition::{RelationshipDefinition, RelationshipKind, RelationshipLoader};
pub use value::{LazyReference, LazyResolver, RecordRef, RelationshipValue};
