//! Signal system for model persistence events
//!
//! This crate provides the callback registry through which host code
//! observes models being created, updated and deleted.

pub mod event;
pub mod manager;
pub mod prelude;
pub mod types;

pub use event::{EventType, ModelEvent};
pub use manager::{CallbackId, SignalManager};
pub use types::{EventCallback, EventProcessingError, ModelValue, ValueMap};
