//! # modelhaus
//!
//! An active-record model layer: typed property schemas, change tracking,
//! construction from row data under strictness modes, relationships and
//! repository/query hooks for persistence.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modelhaus::prelude::*;
//!
//! #[model(name = "user")]
//! #[property(id: int)]
//! #[property(name: string, required)]
//! #[property(email: string | null, required_on_save)]
//! pub struct User {
//!     state: ModelState,
//! }
//!
//! impl Model for User {}
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let haus = ModelHaus::new();
//!     let users = haus.memory_repository::<User>();
//!
//!     let mut user = User::new(serde_json::json!({"name": "John Doe"}))?;
//!     user.set_attribute("email", "john@example.com")?;
//!
//!     let created = users.insert(user)?;
//!     println!("Created user {:?}", created.primary_value());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::ModelHaus;
pub use crate::errors::ModelHausError;

// Re-export centralized config
pub use config::{AppConfig, ModelConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use model_object;
pub use model_derive;
pub use cache_system;
pub use signal_system;
pub use type_mapping;
