//! Hand-written model types shared by the unit tests

use crate::errors::ModelResult;
use crate::property::PropertyDefinition;
use crate::relationship::{LazyReference, RecordRef, RelationshipDefinition, RelationshipKind, RelationshipValue};
use crate::traits::Model;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use type_mapping::{ModelValue, ValueMap};

macro_rules! impl_schema {
    ($ty:ident, $name:literal, [$(($key:literal, $decl:expr)),* $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $ty {
            state: $crate::state::ModelState,
        }

        impl $crate::traits::ModelSchema for $ty {
            fn model_name() -> &'static str {
                $name
            }

            fn declared_properties(
            ) -> $crate::errors::ModelResult<Vec<(String, $crate::property::PropertyDeclaration)>> {
                Ok(vec![$(($key.to_string(), $crate::property::PropertyDeclaration::from($decl))),*])
            }

            fn from_state(state: $crate::state::ModelState) -> Self {
                Self { state }
            }

            fn state(&self) -> &$crate::state::ModelState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut $crate::state::ModelState {
                &mut self.state
            }
        }
    };
}

pub(crate) use impl_schema;

impl_schema!(Product, "product", [
    ("id", "int"),
    ("name", "string"),
    ("price", ("float", 5.99)),
    ("sku", "string"),
]);

impl Model for Product {
    fn property_definitions() -> ModelResult<Vec<(String, PropertyDefinition)>> {
        Ok(vec![
            ("name".to_string(), PropertyDefinition::new().required()?),
            (
                "sku".to_string(),
                PropertyDefinition::new().nullable()?.required_on_save()?,
            ),
        ])
    }
}

impl_schema!(Pair, "pair", [
    ("a", PropertyDefinition::new().of_type("int").unwrap()),
    ("b", PropertyDefinition::new().of_type("int").unwrap()),
]);

impl Model for Pair {}

impl_schema!(DefaultedPair, "defaulted_pair", [
    ("a", PropertyDefinition::new().of_type("int").unwrap()),
    ("b", ("int", 10)),
]);

impl Model for DefaultedPair {}

impl_schema!(Item, "item", [
    ("id", PropertyDefinition::new().of_type("int").unwrap().readonly().unwrap()),
    ("name", PropertyDefinition::new()),
]);

impl Model for Item {}

// Trims names and rejects negative stock after construction
impl_schema!(Stock, "stock", [
    ("id", "int"),
    ("name", "string"),
    ("quantity", ("int", 0)),
]);

impl Model for Stock {
    fn after_construct(&mut self) -> ModelResult<()> {
        if let Some(ModelValue::String(name)) = self.get_attribute("name")?.cloned() {
            self.set_attribute("name", name.trim())?;
        }
        if let Some(ModelValue::Int(n)) = self.get_attribute("quantity")? {
            if *n < 0 {
                return Err(crate::errors::ModelError::invalid_argument(
                    "quantity cannot be negative",
                    vec!["quantity".to_string()],
                ));
            }
        }
        Ok(())
    }
}

pub static READING_CASTS: AtomicUsize = AtomicUsize::new(0);

// Strings cast to their length; "raw" passes through uncast
impl_schema!(Reading, "reading", [
    ("id", "int"),
    (
        "level",
        PropertyDefinition::new()
            .of_type("int")
            .unwrap()
            .cast_with(|value, _| {
                READING_CASTS.fetch_add(1, Ordering::SeqCst);
                match value {
                    ModelValue::String(s) if s == "raw" => Ok(ModelValue::String(s)),
                    ModelValue::String(s) => Ok(ModelValue::Int(s.len() as i64)),
                    other => Ok(other),
                }
            })
            .unwrap()
    ),
]);

impl Model for Reading {}

impl_schema!(Author, "author", [
    ("id", "int"),
    ("name", "string"),
]);

impl Model for Author {}

pub fn author(id: &ModelValue) -> ModelResult<Author> {
    let mut attributes = ValueMap::new();
    attributes.insert("id".to_string(), id.clone());
    attributes.insert("name".to_string(), format!("Author {}", id).into());
    Author::from_data(attributes, crate::build_mode::BuildMode::default())
}

pub static COUNTED_LOADS: AtomicUsize = AtomicUsize::new(0);

impl_schema!(Book, "book", [
    ("id", "int"),
    ("author_id", "int"),
    ("title", "string"),
]);

impl Model for Book {
    fn relationships() -> ModelResult<Vec<(String, RelationshipDefinition)>> {
        Ok(vec![
            (
                "author".to_string(),
                RelationshipDefinition::new(RelationshipKind::BelongsTo).loader(|properties| {
                    match properties.get("author_id").and_then(|p| p.value()) {
                        Some(id) if !id.is_null() => Ok(RelationshipValue::one(author(id)?)),
                        _ => Ok(RelationshipValue::Empty),
                    }
                })?,
            ),
            (
                "counted_author".to_string(),
                RelationshipDefinition::new(RelationshipKind::BelongsTo).loader(|_| {
                    COUNTED_LOADS.fetch_add(1, Ordering::SeqCst);
                    Ok(RelationshipValue::one(author(&ModelValue::Int(1))?))
                })?,
            ),
            (
                "lazy_author".to_string(),
                RelationshipDefinition::new(RelationshipKind::BelongsTo).loader(|properties| {
                    let id = properties
                        .get("author_id")
                        .and_then(|p| p.value())
                        .cloned()
                        .unwrap_or_default();
                    Ok(RelationshipValue::Lazy(LazyReference::new(id, |id| {
                        if id.is_null() {
                            return Ok(None);
                        }
                        Ok(Some(Arc::new(author(id)?) as RecordRef))
                    })))
                })?,
            ),
            (
                "reviewers".to_string(),
                RelationshipDefinition::new(RelationshipKind::BelongsToMany).loader(|_| {
                    Ok(RelationshipValue::many(vec![
                        author(&ModelValue::Int(7))?,
                        author(&ModelValue::Int(8))?,
                    ]))
                })?,
            ),
            (
                "publisher".to_string(),
                RelationshipDefinition::new(RelationshipKind::HasOne),
            ),
            (
                "broken".to_string(),
                RelationshipDefinition::new(RelationshipKind::HasOne)
                    .loader(|_| Ok(RelationshipValue::Many(Vec::new())))?,
            ),
        ])
    }
}
