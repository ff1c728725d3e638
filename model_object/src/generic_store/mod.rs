//! Generic store implementations
//!
//! This module provides the in-memory repository.

pub mod core;
pub mod repository;


pub use self::core::MemoryRepository;
