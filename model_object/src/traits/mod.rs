//! Traits for model types
//!
//! `ModelSchema` describes a type and gives access to its state, `Model`
//! carries the active-record behaviour, `ModelRecord` is the object-safe
//! view used by relationships and `PersistableModel` binds a type to a
//! `Repository`.

pub mod model;
pub mod record;
pub mod repository;
pub mod schema;

#[cfg(test)]
mod tests;

pub use model::Model;
pub use record::ModelRecord;
pub use repository::{PersistableModel, Repository};
pub use schema::ModelSchema;
