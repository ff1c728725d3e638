//! Cache system for per-type memoized registries
//!
//! This crate provides the build-once, read-many cache used to hold
//! schema data keyed by Rust type identity.

pub mod manager;
pub mod prelude;
pub mod stats;

pub use manager::TypeCache;
pub use stats::{CacheSnapshot, CacheStats};
