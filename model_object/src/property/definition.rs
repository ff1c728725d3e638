//! Property definitions
//!
//! A `PropertyDefinition` is the schema of one attribute: accepted types,
//! nullability, default, flags and an optional cast. Definitions are built
//! fully, locked, then shared by every instance of the owning model type.

use crate::errors::{ModelError, ModelResult};
use std::fmt;
use std::sync::Arc;
use type_mapping::{ModelValue, TypeTag};

/// Zero-argument default producer, re-invoked on every use
pub type DefaultFn = Arc<dyn Fn() -> ModelValue + Send + Sync>;

/// Custom cast applied to values that fail validation
pub type CastFn = Arc<dyn Fn(ModelValue, &PropertyDefinition) -> ModelResult<ModelValue> + Send + Sync>;

/// Default value of a property
#[derive(Clone)]
pub enum PropertyDefault {
    Value(ModelValue),
    Computed(DefaultFn),
}

impl PropertyDefault {
    /// Produce the default; computed defaults are evaluated fresh each call
    pub fn produce(&self) -> ModelValue {
        match self {
            PropertyDefault::Value(value) => value.clone(),
            PropertyDefault::Computed(build) => build(),
        }
    }
}

impl fmt::Debug for PropertyDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            PropertyDefault::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Schema of a single model attribute
#[derive(Clone)]
pub struct PropertyDefinition {
    types: Vec<TypeTag>,
    nullable: bool,
    required: bool,
    required_on_save: bool,
    readonly: bool,
    default: Option<PropertyDefault>,
    cast: Option<CastFn>,
    locked: bool,
}

impl fmt::Debug for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDefinition")
            .field("types", &self.types)
            .field("nullable", &self.nullable)
            .field("required", &self.required)
            .field("required_on_save", &self.required_on_save)
            .field("readonly", &self.readonly)
            .field("default", &self.default)
            .field("has_cast", &self.cast.is_some())
            .field("locked", &self.locked)
            .finish()
    }
}

impl Default for PropertyDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyDefinition {
    /// New unlocked definition accepting strings
    pub fn new() -> Self {
        Self {
            types: vec![TypeTag::String],
            nullable: false,
            required: false,
            required_on_save: false,
            readonly: false,
            default: None,
            cast: None,
            locked: false,
        }
    }

    /// Build a definition from shorthand: a type name, or `[type name, default]`
    ///
    /// Shorthand definitions are always nullable.
    pub fn from_shorthand(shorthand: &ModelValue) -> ModelResult<Self> {
        let definition = match shorthand {
            ModelValue::String(type_name) => Self::new().of_type(TypeTag::parse(type_name))?,
            ModelValue::Array(items) => match items.as_slice() {
                [ModelValue::String(type_name), default] => Self::new()
                    .of_type(TypeTag::parse(type_name))?
                    .default_value(default.clone())?,
                _ => {
                    return Err(ModelError::invalid_argument(
                        "Property shorthand must be a type name or a [type, default] pair",
                        Vec::new(),
                    ))
                }
            },
            other => {
                return Err(ModelError::invalid_argument(
                    format!(
                        "Property shorthand must be a type name or a [type, default] pair, got {}",
                        other.kind_name()
                    ),
                    Vec::new(),
                ))
            }
        };
        definition.nullable()
    }

    fn check_lock(&self) -> ModelResult<()> {
        if self.locked {
            return Err(ModelError::locked("Property definition"));
        }
        Ok(())
    }

    /// Replace the accepted type set
    pub fn types<I, T>(mut self, types: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        self.check_lock()?;
        let mut tags: Vec<TypeTag> = Vec::new();
        for tag in types.into_iter().map(Into::into) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.is_empty() {
            return Err(ModelError::invalid_argument(
                "A property definition needs at least one type",
                Vec::new(),
            ));
        }
        self.types = tags;
        Ok(self)
    }

    /// Replace the accepted type set with a single type
    pub fn of_type(self, tag: impl Into<TypeTag>) -> ModelResult<Self> {
        self.types([tag.into()])
    }

    pub fn default_value(mut self, value: impl Into<ModelValue>) -> ModelResult<Self> {
        self.check_lock()?;
        self.default = Some(PropertyDefault::Value(value.into()));
        Ok(self)
    }

    /// Set a computed default, evaluated again every time it is needed
    pub fn default_with<F>(mut self, build: F) -> ModelResult<Self>
    where
        F: Fn() -> ModelValue + Send + Sync + 'static,
    {
        self.check_lock()?;
        self.default = Some(PropertyDefault::Computed(Arc::new(build)));
        Ok(self)
    }

    pub fn nullable(mut self) -> ModelResult<Self> {
        self.check_lock()?;
        self.nullable = true;
        Ok(self)
    }

    pub fn required(mut self) -> ModelResult<Self> {
        self.check_lock()?;
        self.required = true;
        Ok(self)
    }

    pub fn required_on_save(mut self) -> ModelResult<Self> {
        self.check_lock()?;
        self.required_on_save = true;
        Ok(self)
    }

    pub fn readonly(mut self) -> ModelResult<Self> {
        self.check_lock()?;
        self.readonly = true;
        Ok(self)
    }

    pub fn cast_with<F>(mut self, cast: F) -> ModelResult<Self>
    where
        F: Fn(ModelValue, &PropertyDefinition) -> ModelResult<ModelValue> + Send + Sync + 'static,
    {
        self.check_lock()?;
        self.cast = Some(Arc::new(cast));
        Ok(self)
    }

    /// Lock the definition; idempotent
    pub fn lock(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn types_list(&self) -> &[TypeTag] {
        &self.types
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_required_on_save(&self) -> bool {
        self.required_on_save
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Whether the value satisfies nullability and the type set
    pub fn is_valid_value(&self, value: &ModelValue) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        self.types.iter().any(|tag| tag.matches(value))
    }

    pub fn can_cast(&self) -> bool {
        self.cast.is_some()
    }

    /// Apply the custom cast
    pub fn cast(&self, value: ModelValue) -> ModelResult<ModelValue> {
        match &self.cast {
            Some(cast) => cast(value, self),
            None => Err(ModelError::invalid_argument("No cast method set", Vec::new())),
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Produce the default value; computed defaults run on every call
    pub fn get_default(&self) -> Option<ModelValue> {
        self.default.as_ref().map(PropertyDefault::produce)
    }

    /// Human-readable type set, e.g. `int|string`
    pub fn type_names(&self) -> String {
        let mut names: Vec<&str> = self.types.iter().map(TypeTag::name).collect();
        if self.nullable {
            names.push("null");
        }
        names.join("|")
    }
}

/// Property as declared on a model: shorthand or full definition
#[derive(Debug, Clone)]
pub enum PropertyDeclaration {
    Shorthand(ModelValue),
    Definition(PropertyDefinition),
}

impl PropertyDeclaration {
    pub fn resolve(self) -> ModelResult<PropertyDefinition> {
        match self {
            PropertyDeclaration::Shorthand(shorthand) => PropertyDefinition::from_shorthand(&shorthand),
            PropertyDeclaration::Definition(definition) => Ok(definition),
        }
    }
}

impl From<PropertyDefinition> for PropertyDeclaration {
    fn from(definition: PropertyDefinition) -> Self {
        PropertyDeclaration::Definition(definition)
    }
}

impl From<&str> for PropertyDeclaration {
    fn from(type_name: &str) -> Self {
        PropertyDeclaration::Shorthand(ModelValue::from(type_name))
    }
}

impl<V: Into<ModelValue>> From<(&str, V)> for PropertyDeclaration {
    fn from((type_name, default): (&str, V)) -> Self {
        PropertyDeclaration::Shorthand(ModelValue::Array(vec![
            ModelValue::from(type_name),
            default.into(),
        ]))
    }
}
