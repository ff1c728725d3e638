//! Type definitions for signal system
//!
//! This module contains the callback and error types
//! shared by the signal manager and its callers.

use crate::event::ModelEvent;
use crate::manager::CallbackId;
use std::sync::Arc;

// Re-export from type-mapping for convenience
pub use type_mapping::{ModelValue, ValueMap};

/// Event callback type that returns a Result
pub type EventCallback = Arc<dyn Fn(&ModelEvent) -> anyhow::Result<()> + Send + Sync>;

/// Event processing error
#[derive(Debug)]
pub struct EventProcessingError {
    pub callback_id: CallbackId,
    pub error: anyhow::Error,
}
