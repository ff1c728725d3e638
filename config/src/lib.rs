//! # Configuration Management for modelhaus
//!
//! This crate provides the process-wide configuration surface of the model layer:
//! the namespacing prefix used for hook names, and the set-once cells that hold
//! process-wide registrations.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{ModelConfig, PrefixRegistry};
//!
//! let registry = PrefixRegistry::new();
//! let model_config = ModelConfig::new("my-plugin".to_string());
//! registry.set(&model_config.prefix)?;
//! assert_eq!(registry.hook_name("model_saved"), "my-plugin_model_saved");
//! # Ok::<(), config::ConfigError>(())
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [model]
//! prefix = "my-plugin"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from modelhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//!
//! // Install the prefix for the whole process (only once)
//! config.apply()?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./modelhaus.toml";
const CONFIG_PATH_VAR: &str = "MODELHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("{0} has already been set")]
    AlreadySet(&'static str),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
}

/// Model layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Namespacing prefix for hook names, must match `^[a-z0-9_-]+$`
    pub prefix: String,
}

impl AppConfig {
    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine, a malformed one is not
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix(&self.model.prefix)
    }

    /// Install this configuration into the process-wide registries
    pub fn apply(&self) -> Result<(), ConfigError> {
        set_prefix(&self.model.prefix)
    }
}

impl ModelConfig {
    /// Create a new model configuration
    pub fn new(prefix: String) -> Self {
        Self { prefix }
    }
}

/// Check a namespacing prefix against `^[a-z0-9_-]+$`
pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::Invalid("Prefix cannot be empty".to_string()));
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(ConfigError::Invalid(format!(
            "Prefix '{}' may only contain lowercase letters, digits, underscores and dashes",
            prefix
        )));
    }

    Ok(())
}

/// A value that may be assigned exactly once for the lifetime of its owner
#[derive(Debug)]
pub struct SetOnce<T> {
    name: &'static str,
    cell: OnceLock<T>,
}

impl<T> SetOnce<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    /// Assign the value; a second assignment fails with `AlreadySet`
    pub fn set(&self, value: T) -> Result<(), ConfigError> {
        self.cell
            .set(value)
            .map_err(|_| ConfigError::AlreadySet(self.name))
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Holder of the namespacing prefix
#[derive(Debug)]
pub struct PrefixRegistry {
    prefix: SetOnce<String>,
}

impl PrefixRegistry {
    pub const fn new() -> Self {
        Self {
            prefix: SetOnce::new("Prefix"),
        }
    }

    /// Validate and store the prefix, only once
    pub fn set(&self, prefix: &str) -> Result<(), ConfigError> {
        validate_prefix(prefix)?;
        self.prefix.set(prefix.to_string())
    }

    pub fn get(&self) -> Option<&str> {
        self.prefix.get().map(String::as_str)
    }

    pub fn is_set(&self) -> bool {
        self.prefix.is_set()
    }

    /// Build a hook name, namespaced when a prefix is set
    pub fn hook_name(&self, name: &str) -> String {
        match self.get() {
            Some(prefix) => format!("{}_{}", prefix, name),
            None => name.to_string(),
        }
    }
}

impl Default for PrefixRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_PREFIX: PrefixRegistry = PrefixRegistry::new();

/// Set the process-wide prefix; fails if invalid or already set
pub fn set_prefix(prefix: &str) -> Result<(), ConfigError> {
    GLOBAL_PREFIX.set(prefix)
}

/// The process-wide prefix, if one has been set
pub fn prefix() -> Option<&'static str> {
    GLOBAL_PREFIX.get()
}

/// Build a hook name namespaced by the process-wide prefix
pub fn hook_name(name: &str) -> String {
    GLOBAL_PREFIX.hook_name(name)
}
