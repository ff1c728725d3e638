//! Error types for model operations
//!
//! Every failure of the model layer is surfaced synchronously as a
//! `ModelError`; nothing is retried or swallowed.

use config::{ConfigError, SetOnce};
use std::error::Error as StdError;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

/// Boxed error attached by a custom `ErrorFactory`
pub type ErrorSource = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("{message}")]
    InvalidArgument {
        message: String,
        /// Offending property or relationship keys
        keys: Vec<String>,
        #[source]
        source: Option<ErrorSource>,
    },

    #[error("Cannot modify readonly property: {key}")]
    ReadOnly {
        key: String,
        #[source]
        source: Option<ErrorSource>,
    },

    #[error("{subject} is locked and cannot be modified")]
    Locked { subject: String },

    #[error("Missing capability '{capability}' for {name}")]
    MissingCapability { name: String, capability: String },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Kind of a model error, independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    ReadOnly,
    Locked,
    MissingCapability,
    Persistence,
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ModelError::ReadOnly { .. } => ErrorKind::ReadOnly,
            ModelError::Locked { .. } => ErrorKind::Locked,
            ModelError::MissingCapability { .. } => ErrorKind::MissingCapability,
            ModelError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Keys named by an invalid-argument or readonly error
    pub fn keys(&self) -> Vec<&str> {
        match self {
            ModelError::InvalidArgument { keys, .. } => keys.iter().map(String::as_str).collect(),
            ModelError::ReadOnly { key, .. } => vec![key.as_str()],
            _ => Vec::new(),
        }
    }

    /// Invalid-argument error; the registered factory may attach a source
    pub fn invalid_argument(message: impl Into<String>, keys: Vec<String>) -> Self {
        let message = message.into();
        let source = ERROR_FACTORY
            .get()
            .and_then(|factory| factory.invalid_argument_source(&message, &keys));
        ModelError::InvalidArgument {
            message,
            keys,
            source,
        }
    }

    /// Readonly violation; the registered factory may attach a source
    pub fn read_only(key: impl Into<String>) -> Self {
        let key = key.into();
        let source = ERROR_FACTORY
            .get()
            .and_then(|factory| factory.read_only_source(&key));
        ModelError::ReadOnly { key, source }
    }

    pub fn locked(subject: impl Into<String>) -> Self {
        ModelError::Locked {
            subject: subject.into(),
        }
    }

    pub fn missing_capability(name: impl Into<String>, capability: impl Into<String>) -> Self {
        ModelError::MissingCapability {
            name: name.into(),
            capability: capability.into(),
        }
    }

    pub fn unknown_property(key: &str) -> Self {
        Self::invalid_argument(
            format!("Property {} does not exist", key),
            vec![key.to_string()],
        )
    }

    pub fn unknown_relationship(key: &str) -> Self {
        Self::invalid_argument(
            format!("Relationship {} does not exist", key),
            vec![key.to_string()],
        )
    }

    pub fn invalid_value(key: &str, expected: &str, actual: &str) -> Self {
        Self::invalid_argument(
            format!(
                "Invalid value for property {}: expected {}, got {}",
                key, expected, actual
            ),
            vec![key.to_string()],
        )
    }

    pub fn missing_keys(model: &str, keys: Vec<String>) -> Self {
        Self::invalid_argument(
            format!("{} is missing properties: {}", model, keys.join(", ")),
            keys,
        )
    }

    pub fn extra_keys(model: &str, keys: Vec<String>) -> Self {
        Self::invalid_argument(
            format!("{} does not define properties: {}", model, keys.join(", ")),
            keys,
        )
    }

    /// Missing and undefined keys reported together; missing keys come first
    pub fn mismatched_keys(model: &str, missing: Vec<String>, extra: Vec<String>) -> Self {
        match (missing.is_empty(), extra.is_empty()) {
            (_, true) => Self::missing_keys(model, missing),
            (true, false) => Self::extra_keys(model, extra),
            (false, false) => Self::invalid_argument(
                format!(
                    "{} is missing properties: {}; does not define properties: {}",
                    model,
                    missing.join(", "),
                    extra.join(", ")
                ),
                missing.into_iter().chain(extra).collect(),
            ),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_read_only(&self) -> bool {
        self.kind() == ErrorKind::ReadOnly
    }

    pub fn is_locked(&self) -> bool {
        self.kind() == ErrorKind::Locked
    }
}

/// Supplies application errors for invalid arguments and readonly violations
///
/// The returned error is attached as `source` of the model error, which
/// callers recover with `std::error::Error::source` and `downcast_ref`. The
/// kind of the model error itself never changes.
pub trait ErrorFactory: Send + Sync {
    fn invalid_argument_source(&self, _message: &str, _keys: &[String]) -> Option<ErrorSource> {
        None
    }

    fn read_only_source(&self, _key: &str) -> Option<ErrorSource> {
        None
    }
}

static ERROR_FACTORY: SetOnce<Box<dyn ErrorFactory>> = SetOnce::new("Error factory");

/// Register the process-wide error factory; only one registration is allowed
pub fn set_error_factory(factory: Box<dyn ErrorFactory>) -> Result<(), ConfigError> {
    ERROR_FACTORY.set(factory)
}

pub fn has_error_factory() -> bool {
    ERROR_FACTORY.is_set()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_and_keys() {
        let err = ModelError::unknown_property("price");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.keys(), vec!["price"]);
        assert_eq!(err.to_string(), "Property price does not exist");

        let err = ModelError::read_only("id");
        assert!(err.is_read_only());
        assert_eq!(err.keys(), vec!["id"]);

        let err = ModelError::missing_keys("product", vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "product is missing properties: a, b");
    }

    #[test]
    fn test_mismatched_keys_names_both_sets() {
        let err = ModelError::mismatched_keys("pair", vec!["b".into()], vec!["c".into()]);
        assert!(err.is_invalid_argument());
        assert_eq!(err.keys(), vec!["b", "c"]);
        assert_eq!(
            err.to_string(),
            "pair is missing properties: b; does not define properties: c"
        );

        let err = ModelError::mismatched_keys("pair", Vec::new(), vec!["c".into()]);
        assert_eq!(err.to_string(), "pair does not define properties: c");
    }
}
