//! Convenience re-exports for common modelhaus usage
//!
//! This prelude module re-exports the most commonly used items from the modelhaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use modelhaus::prelude::*;
//!
//! // Now you have access to all the common modelhaus types and traits
//! ```

// Core modelhaus components
pub use crate::core::ModelHaus;
pub use crate::errors::ModelHausError;

// Re-export centralized config
pub use config::{AppConfig, ModelConfig};

// Re-export commonly used model-object types for convenience
pub use model_object::prelude::*;

// Re-export model_object module for macro-generated code
pub use model_object;

// Re-export signal system for event handling
pub use signal_system::prelude::*;

// Re-export cache system
pub use cache_system::prelude::*;

// Re-export model derive for model creation
pub use model_derive::{ModelSchema, model};

// Common external dependencies
pub use anyhow;
