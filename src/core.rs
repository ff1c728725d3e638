//! Core ModelHaus functionality
//!
//! This module contains the ModelHaus coordinator: it applies configuration,
//! owns the signal manager shared by repositories and keeps a registry of
//! named repositories.

use model_object::{MemoryRepository, Model, Repository};
use signal_system::SignalManager;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ModelHausError;
use config::AppConfig;

/// Main ModelHaus coordinator that manages signals and repositories
pub struct ModelHaus {
    signal_manager: Arc<SignalManager>,
    repositories: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for ModelHaus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHaus")
            .field("signal_manager", &self.signal_manager)
            .field("repositories", &self.repositories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModelHaus {
    /// Create a coordinator without touching process-wide configuration
    pub fn new() -> Self {
        Self {
            signal_manager: Arc::new(SignalManager::new()),
            repositories: HashMap::new(),
        }
    }

    /// Create a coordinator and install the configured prefix
    ///
    /// The prefix is process-wide and can be installed once.
    pub fn with_config(config: &AppConfig) -> Result<Self, ModelHausError> {
        config.validate()?;
        config.apply()?;
        crate::debug_log!("Installed model prefix {}", config.model.prefix);
        Ok(Self::new())
    }

    /// Get the signal manager shared by repositories created here
    pub fn signal_manager(&self) -> &Arc<SignalManager> {
        &self.signal_manager
    }

    /// In-memory repository reporting to this coordinator's signal manager
    pub fn memory_repository<M: Model>(&self) -> MemoryRepository<M> {
        MemoryRepository::new(Some(Arc::clone(&self.signal_manager)))
    }

    /// Register a repository with a given name
    pub fn register_repository<M: Model>(
        &mut self,
        name: String,
        repository: Arc<dyn Repository<M>>,
    ) -> Result<(), ModelHausError> {
        if self.repositories.contains_key(&name) {
            return Err(ModelHausError::RepositoryAlreadyRegistered(name));
        }

        crate::debug_log!("Registered repository {} for {}", name, M::model_name());
        self.repositories.insert(name, Box::new(repository));
        Ok(())
    }

    /// Get a registered repository by name
    ///
    /// Fails when the name is unknown or registered for another model type.
    pub fn get_repository<M: Model>(
        &self,
        name: &str,
    ) -> Result<Arc<dyn Repository<M>>, ModelHausError> {
        self.repositories
            .get(name)
            .and_then(|repository| repository.downcast_ref::<Arc<dyn Repository<M>>>())
            .cloned()
            .ok_or_else(|| ModelHausError::RepositoryNotFound(name.to_string()))
    }

    /// List all registered repository names
    pub fn list_repositories(&self) -> Vec<&String> {
        self.repositories.keys().collect()
    }

    /// Remove a repository by name
    pub fn unregister_repository(&mut self, name: &str) -> Result<(), ModelHausError> {
        self.repositories
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ModelHausError::RepositoryNotFound(name.to_string()))
    }
}

impl Default for ModelHaus {
    fn default() -> Self {
        Self::new()
    }
}
