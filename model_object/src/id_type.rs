//! Id Type module
//!
//! Primary key values as used for repository keys and event record ids.

use std::fmt::{self, Display};
use type_mapping::ModelValue;
use uuid::Uuid;

/// Universal ID type that can handle both numeric IDs and UUIDs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniversalId {
    /// Numeric ID
    Numeric(i64),
    /// UUID ID
    Uuid(Uuid),
    /// String-based ID
    String(String),
}

impl UniversalId {
    /// Read a primary key value; other kinds cannot identify a record
    pub fn from_value(value: &ModelValue) -> Option<Self> {
        match value {
            ModelValue::Int(n) => Some(UniversalId::Numeric(*n)),
            ModelValue::Uuid(id) => Some(UniversalId::Uuid(*id)),
            ModelValue::String(s) if !s.is_empty() => Some(UniversalId::String(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> ModelValue {
        match self {
            UniversalId::Numeric(n) => ModelValue::Int(*n),
            UniversalId::Uuid(id) => ModelValue::Uuid(*id),
            UniversalId::String(s) => ModelValue::String(s.clone()),
        }
    }
}

impl Display for UniversalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniversalId::Numeric(n) => write!(f, "{}", n),
            UniversalId::Uuid(uuid) => write!(f, "{}", uuid),
            UniversalId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for UniversalId {
    fn from(id: i64) -> Self {
        UniversalId::Numeric(id)
    }
}

impl From<Uuid> for UniversalId {
    fn from(id: Uuid) -> Self {
        UniversalId::Uuid(id)
    }
}

impl From<&str> for UniversalId {
    fn from(id: &str) -> Self {
        UniversalId::String(id.to_string())
    }
}

impl From<UniversalId> for ModelValue {
    fn from(id: UniversalId) -> Self {
        id.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(
            UniversalId::from_value(&ModelValue::Int(7)),
            Some(UniversalId::Numeric(7))
        );
        assert_eq!(
            UniversalId::from_value(&"sku-1".into()),
            Some(UniversalId::String("sku-1".to_string()))
        );
        assert_eq!(UniversalId::from_value(&"".into()), None);
        assert_eq!(UniversalId::from_value(&ModelValue::Null), None);
        assert_eq!(UniversalId::from_value(&ModelValue::Float(1.5)), None);

        let id = Uuid::new_v4();
        assert_eq!(UniversalId::from(id).to_string(), id.to_string());
        assert_eq!(ModelValue::from(UniversalId::from(3)), ModelValue::Int(3));
    }
}
