//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::manager::TypeCache;
pub use crate::stats::{CacheSnapshot, CacheStats};
