//! Integration test: instance-level and class-level notifications.

mod common;

use std::sync::Arc;

use jsm_model::{names, Builder, Event, NodeClass, Schema};
use parking_lot::Mutex;
use serde_json::{json, Value};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, tag: &'static str) -> impl Fn(&Event<'_>) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |event: &Event<'_>| {
        let entry = match event {
            Event::Changed => format!("{tag}:changed"),
            Event::PropertyChanged { key, previous, current } => {
                format!("{tag}:change {key} {previous:?} -> {current}")
            }
            Event::Added { index, node } => format!("{tag}:added {index} {}", node.to_value()),
            Event::Removed { index, node } => {
                format!("{tag}:removed {index} {}", node.map_or(Value::Null, |n| n.to_value()))
            }
            Event::Validated(valid) => format!("{tag}:validated {valid}"),
            Event::Lifecycle { .. } => format!("{tag}:lifecycle"),
        };
        log.lock().push(entry);
    }
}

#[test]
fn test_instance_channel_fires_before_type_channel() {
    let builder = Builder::default();
    let log: Log = Arc::default();
    builder.on_type(NodeClass::Model, names::VALIDATED, recorder(&log, "type"));

    let schema = Schema::new(common::object_simple());
    let mut node = builder.build(Some(&schema), json!({ "one": "1" })).unwrap();
    node.on(names::VALIDATED, recorder(&log, "node"));
    assert!(node.validate());

    assert_eq!(
        *log.lock(),
        vec!["node:validated true", "type:validated true"]
    );
}

#[test]
fn test_set_emits_generic_and_scoped_change() {
    let log: Log = Arc::default();
    let mut node = common::build(common::object_simple(), json!({ "one": "1", "two": 2 }));
    node.on(names::CHANGE, recorder(&log, "any"));
    node.on(names::change_of("two"), recorder(&log, "two"));
    node.on(names::change_of("one"), recorder(&log, "one"));

    node.as_model_mut().unwrap().set("two", json!(3));
    node.as_model_mut().unwrap().set("three", json!(true));

    assert_eq!(
        *log.lock(),
        vec![
            "any:change two Some(Number(2)) -> 3",
            "two:change two Some(Number(2)) -> 3",
            "any:change three None -> true",
        ]
    );
}

#[test]
fn test_set_leaves_other_properties_untouched() {
    let mut node = common::build(
        common::object_simple(),
        json!({ "one": "1", "two": 2, "three": false }),
    );
    node.as_model_mut().unwrap().set("two", json!(20));
    assert_eq!(node.to_value(), json!({ "one": "1", "two": 20, "three": false }));
}

#[test]
fn test_collection_build_push_remove_events() {
    let builder = Builder::default();
    let log: Log = Arc::default();
    builder.on_type(NodeClass::Collection, names::CHANGED, recorder(&log, "type"));

    let schema = Schema::new(json!({ "type": "array" }));
    let mut node = builder.build(Some(&schema), json!(["a"])).unwrap();
    node.on(names::ADDED, recorder(&log, "node"));
    node.on(names::REMOVED, recorder(&log, "node"));

    let collection = node.as_collection_mut().unwrap();
    collection.push(json!("b"));
    collection.remove(0);
    collection.remove(9);

    assert_eq!(
        *log.lock(),
        vec![
            "type:changed",
            "node:added 1 \"b\"",
            "node:removed 0 \"a\"",
            "node:removed 9 null",
        ]
    );
}

#[test]
fn test_build_emits_added_per_item_then_changed() {
    let log: Log = Arc::default();
    let mut node = common::build(json!({ "type": "array" }), json!([]));
    node.on(names::ADDED, recorder(&log, "node"));
    node.on(names::CHANGED, recorder(&log, "node"));

    node.build(json!([1, 2]));
    assert_eq!(
        *log.lock(),
        vec!["node:added 0 1", "node:added 1 2", "node:changed"]
    );
}

#[test]
fn test_type_channels_are_per_builder() {
    let first = Builder::default();
    let second = Builder::default();
    let log: Log = Arc::default();
    first.on_type(NodeClass::Model, names::CHANGED, recorder(&log, "first"));

    let schema = Schema::new(json!({}));
    second.build(Some(&schema), json!({})).unwrap();
    assert!(log.lock().is_empty());

    first.build(Some(&schema), json!({})).unwrap();
    assert_eq!(*log.lock(), vec!["first:changed"]);
}
