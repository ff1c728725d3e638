//! Query builder utilities
//!
//! This module connects row sources to model construction.

pub mod builder;
pub mod executor;
pub mod ordering;


pub use builder::ModelQuery;
pub use executor::{QueryExecutor, RowSet};
pub use ordering::SortOrder;
