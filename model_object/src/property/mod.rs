//! Property layer
//!
//! `PropertyDefinition` describes an attribute, `Property` holds its live
//! value in one instance and `PropertyCollection` groups the properties of
//! an instance in declaration order.

pub mod collection;
pub mod definition;
pub mod value;

pub use collection::{PropertyCollection, PropertyDefinitions};
pub use definition::{CastFn, DefaultFn, PropertyDeclaration, PropertyDefault, PropertyDefinition};
pub use value::Property;
