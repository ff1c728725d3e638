//! Error types for the modelhaus crate
//!
//! This module contains the errors returned by the `ModelHaus` coordinator.
//! Model-level failures keep their `ModelError` kind.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelHausError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Model(#[from] model_object::ModelError),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Repository already registered: {0}")]
    RepositoryAlreadyRegistered(String),
}
