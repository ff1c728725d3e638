use crate::build_mode::BuildMode;
use crate::errors::ErrorKind;
use crate::registry;
use crate::relationship::RelationshipValue;
use crate::test_support::{
    author, Author, Book, DefaultedPair, Item, Pair, Product, Reading, Stock, COUNTED_LOADS,
    READING_CASTS,
};
use crate::traits::{Model, ModelRecord, ModelSchema};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use type_mapping::ModelValue;

// ========================================
// Construction and lifecycle
// ========================================

#[test]
fn test_basic_lifecycle() {
    let mut product = Product::new(json!({"name": "Original", "price": 5.99})).unwrap();
    assert!(product.is_clean());

    product.set_attribute("name", "New").unwrap();
    assert!(product.is_attribute_dirty("name"));

    let dirty = product.get_dirty();
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty.get("name"), Some(&ModelValue::from("New")));

    product.commit_changes();
    assert!(!product.is_attribute_dirty("name"));
    assert_eq!(product.get_original("name").unwrap(), Some(&ModelValue::from("New")));
}

#[test]
fn test_revert_single_field() {
    let mut product = Product::new(json!({"name": "Widget", "price": 5.99})).unwrap();
    product.set_attribute("price", 7.99).unwrap();
    product.set_attribute("name", "Gadget").unwrap();

    product.revert_change("price").unwrap();
    assert_eq!(product.get_attribute("price").unwrap(), Some(&ModelValue::Float(5.99)));
    assert!(product.is_attribute_dirty("name"));

    product.revert_changes();
    assert!(product.is_clean());
    assert_eq!(product.get_attribute("name").unwrap(), Some(&ModelValue::from("Widget")));
}

#[test]
fn test_merged_definitions_keep_declared_order() {
    let definitions = Product::definitions().unwrap();
    let keys: Vec<&str> = definitions.properties().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "name", "price", "sku"]);

    // override replaced the nullable shorthand
    let name = definitions.property("name").unwrap();
    assert!(name.is_required());
    assert!(!name.is_nullable());
    assert!(name.is_locked());

    let hits = registry::registry_stats().hits;
    let again = Product::definitions().unwrap();
    assert!(Arc::ptr_eq(&definitions, &again));
    assert!(registry::is_registered::<Product>());
    assert!(registry::registry_stats().hits > hits);
}

#[test]
fn test_new_rejects_unknown_and_missing_required() {
    let err = Product::new(json!({"name": "Widget", "colour": "red"})).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.keys(), vec!["colour"]);

    let err = Product::new(json!({"price": 1.0})).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.keys(), vec!["name"]);
}

#[test]
fn test_defaults_and_set_state() {
    let product = Product::new(json!({"name": "Widget"})).unwrap();
    assert_eq!(product.get_attribute("price").unwrap(), Some(&ModelValue::Float(5.99)));
    assert!(!product.is_set("id"));
    assert!(product.is_set("price"));
    assert_eq!(product.get_attribute("id").unwrap(), None);
    assert!(product.get_attribute("colour").is_err());

    let product = Product::new(json!({"name": "Widget", "sku": null})).unwrap();
    assert!(product.is_set("sku"));
}

#[test]
fn test_fill_and_set_attributes() {
    let mut product = Product::new(json!({"name": "Widget"})).unwrap();
    product
        .fill(json!({"name": "Gadget", "price": 2.5}))
        .unwrap()
        .set_attribute("sku", "G-1")
        .unwrap();
    assert_eq!(product.get_dirty().len(), 3);

    let err = product.set_attribute("price", "cheap").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(product.get_attribute("price").unwrap(), Some(&ModelValue::Float(2.5)));

    product.unset_attribute("sku").unwrap();
    assert!(!product.is_set("sku"));
}

#[test]
fn test_serialization_views() {
    let product = Product::new(json!({"id": 3, "name": "Widget"})).unwrap();
    assert_eq!(product.to_json(), json!({"id": 3, "name": "Widget", "price": 5.99}));
    assert_eq!(product.to_map().len(), 3);
    assert_eq!(product.get_originals().len(), 3);
    assert_eq!(product.property_keys(), vec!["id", "name", "price", "sku"]);
    assert!(product.has_property("sku"));
    assert!(!product.has_property("colour"));
    assert!(product.is_property_type_valid("price", &ModelValue::Float(1.0)).unwrap());
    assert!(!product.is_property_type_valid("price", &ModelValue::Int(1)).unwrap());
    assert!(product.is_property_type_valid("colour", &ModelValue::Null).is_err());
    assert_eq!(product.primary_value(), Some(&ModelValue::Int(3)));
}

#[test]
fn test_readonly_attribute() {
    let mut item = Item::new(json!({"id": 1, "name": "a"})).unwrap();
    let err = item.set_attribute("id", 2).unwrap_err();
    assert!(err.is_read_only());
    assert!(item.unset_attribute("id").unwrap_err().is_read_only());
}

#[test]
fn test_after_construct_runs_last() {
    let stock = Stock::new(json!({"name": "  bolts "})).unwrap();
    assert_eq!(stock.get_attribute("name").unwrap(), Some(&ModelValue::from("bolts")));

    let err = Stock::new(json!({"name": "bolts", "quantity": -1})).unwrap_err();
    assert_eq!(err.keys(), vec!["quantity"]);
}

// ========================================
// from_data
// ========================================

#[test]
fn test_strictness_matrix() {
    let input = || json!({"a": 1, "c": 2});

    let err = Pair::from_data(input(), BuildMode::STRICT).unwrap_err();
    assert_eq!(err.keys(), vec!["b", "c"]);
    assert!(err.to_string().contains("missing properties: b"));
    assert!(err.to_string().contains("does not define properties: c"));

    let err = Pair::from_data(input(), BuildMode::IGNORE_MISSING).unwrap_err();
    assert_eq!(err.keys(), vec!["c"]);

    let pair = Pair::from_data(input(), BuildMode::IGNORE_MISSING | BuildMode::IGNORE_EXTRA).unwrap();
    assert_eq!(pair.get_attribute("a").unwrap(), Some(&ModelValue::Int(1)));
    assert!(!pair.is_set("b"));
    assert!(!pair.has_property("c"));

    let err = Pair::from_data(input(), BuildMode::IGNORE_EXTRA).unwrap_err();
    assert_eq!(err.keys(), vec!["b"]);

    let pair = DefaultedPair::from_data(input(), BuildMode::IGNORE_EXTRA).unwrap();
    assert_eq!(pair.get_attribute("b").unwrap(), Some(&ModelValue::Int(10)));

    let pair = DefaultedPair::from_data(input(), BuildMode::default()).unwrap();
    assert!(pair.is_set("b"));
}

#[test]
fn test_strict_rejection_cites_missing_key() {
    let err = Item::from_data(json!({"id": 1}), BuildMode::STRICT).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.keys(), vec!["name"]);
    assert!(err.to_string().contains("name"));
}

#[test]
fn test_from_data_coerces_scalars() {
    let product = Product::from_data(
        json!({"id": "12", "name": 42, "price": "3.5", "sku": null}),
        BuildMode::default(),
    )
    .unwrap();
    assert_eq!(product.get_attribute("id").unwrap(), Some(&ModelValue::Int(12)));
    assert_eq!(product.get_attribute("name").unwrap(), Some(&ModelValue::from("42")));
    assert_eq!(product.get_attribute("price").unwrap(), Some(&ModelValue::Float(3.5)));

    let err = Product::from_data(
        json!({"id": 1, "name": "x", "price": [1], "sku": null}),
        BuildMode::default(),
    )
    .unwrap_err();
    assert_eq!(err.keys(), vec!["price"]);
    assert!(err.to_string().contains("unexpected type"));

    let err = Product::from_data(
        json!({"id": "99999999999999999999", "name": "x", "sku": null}),
        BuildMode::default(),
    )
    .unwrap_err();
    assert_eq!(err.keys(), vec!["id"]);
}

#[test]
fn test_from_data_with_primary_key_is_clean() {
    let product = Product::from_data(
        json!({"id": 5, "name": "Widget", "sku": "W-5"}),
        BuildMode::default(),
    )
    .unwrap();
    assert!(product.is_clean());

    let stock = Stock::from_data(json!({"id": 1, "name": " nuts "}), BuildMode::default()).unwrap();
    assert!(stock.is_clean());
    assert_eq!(stock.get_original("name").unwrap(), Some(&ModelValue::from("nuts")));

    let stock = Stock::from_data(
        json!({"name": " nuts "}),
        BuildMode::IGNORE_MISSING | BuildMode::IGNORE_EXTRA,
    )
    .unwrap();
    assert!(stock.is_attribute_dirty("name"));
}

#[test]
fn test_default_mode_requires_nullable_keys_without_default() {
    let err = Product::from_data(json!({"id": 1, "name": "Widget"}), BuildMode::default()).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.keys(), vec!["sku"]);

    let product = Product::from_data(
        json!({"id": 1, "name": "Widget"}),
        BuildMode::IGNORE_MISSING | BuildMode::IGNORE_EXTRA,
    )
    .unwrap();
    assert!(!product.is_set("sku"));
}

#[test]
fn test_custom_cast_runs_once_and_is_validated() {
    let before = READING_CASTS.load(Ordering::SeqCst);
    let reading = Reading::from_data(json!({"id": 1, "level": "abcd"}), BuildMode::default()).unwrap();
    assert_eq!(reading.get_attribute("level").unwrap(), Some(&ModelValue::Int(4)));
    assert_eq!(READING_CASTS.load(Ordering::SeqCst), before + 1);

    let err = Reading::from_data(json!({"id": 2, "level": "raw"}), BuildMode::default()).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.keys(), vec!["level"]);
    assert!(err.to_string().contains("unexpected type"));
    assert!(err.to_string().contains("got string"));
}

#[test]
fn test_from_data_rejects_non_record_input() {
    let err = Product::from_data(json!([1, 2, 3]), BuildMode::default()).unwrap_err();
    assert!(err.is_invalid_argument());
}

// ========================================
// Relationships
// ========================================

fn book() -> Book {
    Book::from_data(json!({"id": 1, "author_id": 4, "title": "Dune"}), BuildMode::default()).unwrap()
}

#[test]
fn test_related_one_loads_and_caches() {
    let mut book = book();
    assert!(!book.is_relationship_loaded("author"));

    let author = book.related_one::<Author>("author").unwrap().unwrap();
    assert_eq!(author.get_attribute("id").unwrap(), Some(&ModelValue::Int(4)));
    assert!(book.is_relationship_loaded("author"));

    assert!(book.purge_relationship("author"));
    assert!(!book.is_relationship_loaded("author"));
}

#[test]
fn test_loader_runs_once_until_purged() {
    let mut book = book();
    let before = COUNTED_LOADS.load(Ordering::SeqCst);
    book.relationship("counted_author").unwrap();
    book.relationship("counted_author").unwrap();
    assert_eq!(COUNTED_LOADS.load(Ordering::SeqCst), before + 1);

    book.purge_relationships();
    book.relationship("counted_author").unwrap();
    assert_eq!(COUNTED_LOADS.load(Ordering::SeqCst), before + 2);
}

#[test]
fn test_lazy_reference_is_resolved_and_cached() {
    let mut book = book();
    let author = book.related_one::<Author>("lazy_author").unwrap().unwrap();
    assert_eq!(author.get_attribute("name").unwrap(), Some(&ModelValue::from("Author 4")));
    assert!(matches!(
        book.state().relationships().get("lazy_author"),
        Some(RelationshipValue::One(_))
    ));

    let mut orphan = Book::from_data(
        json!({"id": 2, "author_id": null, "title": "Anon"}),
        BuildMode::default(),
    )
    .unwrap();
    assert!(orphan.related_one::<Author>("lazy_author").unwrap().is_none());
    assert!(orphan.related_one::<Author>("author").unwrap().is_none());
}

#[test]
fn test_related_many() {
    let mut book = book();
    let reviewers = book.related_many::<Author>("reviewers").unwrap();
    let ids: Vec<_> = reviewers.iter().filter_map(|a| a.record_id()).collect();
    assert_eq!(ids, vec![ModelValue::Int(7), ModelValue::Int(8)]);

    let err = book.related_one::<Author>("reviewers").unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_relationship_errors() {
    let mut book = book();
    let err = book.relationship("editor").unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.keys(), vec!["editor"]);

    let err = book.relationship("publisher").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCapability);

    let err = book.relationship("broken").unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(!book.is_relationship_loaded("broken"));

    let err = book.related_one::<Product>("author").unwrap_err();
    assert!(err.to_string().contains("author"));
}

#[test]
fn test_set_relationship_checks_shape() {
    let mut book = book();
    let err = book
        .set_relationship("author", RelationshipValue::Many(Vec::new()))
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let record = author(&ModelValue::Int(9)).unwrap();
    book.set_relationship("author", RelationshipValue::one(record)).unwrap();
    let loaded = book.related_one::<Author>("author").unwrap().unwrap();
    assert_eq!(loaded.record_name(), "author");
    assert_eq!(loaded.primary_value(), Some(&ModelValue::Int(9)));
}
