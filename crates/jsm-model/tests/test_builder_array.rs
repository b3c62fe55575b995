//! Integration test: building array instances into collections.

mod common;

use jsm_model::NodeClass;
use serde_json::json;

#[test]
fn test_valid_array() {
    let instance = json!([
        { "one": "1", "two": 2, "three": false },
        { "one": "11", "two": 22, "three": true },
        { "one": "111", "two": 222 }
    ]);
    let mut node = common::build(common::array_simple(), instance.clone());
    assert_eq!(node.class(), NodeClass::Collection);

    let collection = node.as_collection().unwrap();
    assert_eq!(collection.len(), 3);
    for i in 0..3 {
        assert_eq!(collection.get(i), Some(instance[i].clone()));
    }
    assert!(node.validate());
}

#[test]
fn test_array_items_take_item_defaults() {
    let instance = json!([
        { "two": 2 },
        { "one": "11", "two": 22 },
        { "two": 222, "three": false }
    ]);
    let mut node = common::build(common::array_defaults(), instance);
    let collection = node.as_collection().unwrap();
    assert_eq!(collection.len(), 3);
    for item in collection {
        let model = item.as_model().unwrap();
        assert!(model.has("one"));
        assert!(model.has("two"));
        assert!(model.has("three"));
    }
    assert_eq!(collection.get(1).unwrap()["one"], "11");
    assert_eq!(collection.get(2).unwrap()["three"], false);
    assert!(node.validate());
}

#[test]
fn test_invalid_item_reports_errors_at_its_index() {
    let instance = json!([
        { "one": "1", "two": 2, "three": false },
        { "one": "11", "two": 22, "three": true },
        { "one": 111, "two": 222 }
    ]);
    let mut node = common::build(common::array_defaults(), instance.clone());
    assert_eq!(node.as_collection().unwrap().get(2).unwrap()["one"], 111);

    assert!(!node.validate());
    let collection = node.as_collection().unwrap();
    assert_eq!(collection.len(), 3);
    assert!(!collection.errors_at(2).is_empty());
    assert!(collection.errors_at(0).is_empty());
    assert_eq!(collection.invalid_items(), vec![2]);

    let item = collection.get_model(2).unwrap().as_model().unwrap();
    assert_eq!(item.invalid_properties(), vec!["one"]);
}

#[test]
fn test_invalid_array_items_of_two() {
    let schema = json!({
        "type": "array",
        "items": { "properties": { "two": { "type": "number" } } }
    });
    let mut node = common::build(schema, json!([{ "two": 2 }, { "two": 22 }, { "two": "bad" }]));
    assert!(!node.validate());
    let collection = node.as_collection().unwrap();
    assert_eq!(collection.len(), 3);
    assert!(!collection.errors_at(2).is_empty());
    assert!(collection.errors_at(0).is_empty());
}

#[test]
fn test_push_uses_item_schema() {
    let mut node = common::build(common::array_defaults(), json!([]));
    let collection = node.as_collection_mut().unwrap();
    let index = collection.push(json!({ "two": 5 }));
    assert_eq!(index, 0);
    assert_eq!(
        collection.get(0),
        Some(json!({ "one": "default", "three": true, "two": 5 }))
    );
}
