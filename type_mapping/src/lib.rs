//! Unified runtime value and type-tag mapping for model attributes
//! This crate provides the value representation shared across the modelhaus ecosystem

pub mod coerce;
pub mod serialize;
pub mod tags;
pub mod types;

pub use coerce::{coerce_to, coerce_to_any};
pub use serialize::{from_json, serialize_to_record, to_json};
pub use tags::TypeTag;
pub use types::{ModelValue, ValueMap};
