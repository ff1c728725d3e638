//! Convenience re-exports for common signal-system usage

// Core signal system components
pub use crate::event::{EventType, ModelEvent};
pub use crate::manager::{CallbackId, SignalManager};
pub use crate::types::{EventCallback, EventProcessingError};

// Common external dependencies
pub use serde::{Deserialize, Serialize};
pub use serde_json;
