//! Property tests: round-trip, rebuild idempotence, error reset, ordering.

mod common;

use jsm_model::Node;
use proptest::prelude::*;
use serde_json::{json, Value};

fn simple_object() -> impl Strategy<Value = Value> {
    (
        proptest::option::of("[a-z]{0,8}"),
        proptest::option::of(-1000i64..1000),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(one, two, three)| {
            let mut map = serde_json::Map::new();
            if let Some(one) = one {
                map.insert("one".into(), json!(one));
            }
            if let Some(two) = two {
                map.insert("two".into(), json!(two));
            }
            if let Some(three) = three {
                map.insert("three".into(), json!(three));
            }
            Value::Object(map)
        })
}

/// Arbitrary JSON, two levels deep.
fn any_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-100i64..100).prop_map(|n| json!(n)),
        "[a-z]{0,4}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn all_errors_empty(node: &Node) -> bool {
    node.errors().is_empty() && node.children().all(all_errors_empty)
}

proptest! {
    #[test]
    fn prop_round_trip_without_defaults(instance in any_json()) {
        let node = common::build(json!({}), instance.clone());
        prop_assert_eq!(node.to_value(), instance);
    }

    #[test]
    fn prop_round_trip_applies_defaults(instance in simple_object()) {
        let node = common::build(common::object_defaults(), instance.clone());
        let value = node.to_value();
        let default_one = json!("default");
        let default_three = json!(true);
        prop_assert_eq!(&value["one"], instance.get("one").unwrap_or(&default_one));
        prop_assert_eq!(&value["three"], instance.get("three").unwrap_or(&default_three));
        prop_assert_eq!(value.get("two"), instance.get("two"));
    }

    #[test]
    fn prop_rebuild_is_idempotent(instance in any_json()) {
        let mut node = common::build(common::object_simple(), instance.clone());
        node.build(instance.clone());
        let first = node.to_value();
        node.build(instance);
        prop_assert_eq!(node.to_value(), first);
    }

    #[test]
    fn prop_reset_clears_every_level(instance in any_json()) {
        let schema = json!({
            "type": "object",
            "additionalProperties": { "type": "string" },
            "items": { "type": "number" }
        });
        let mut node = common::build(schema, instance);
        node.validate();
        node.reset_errors();
        prop_assert!(all_errors_empty(&node));
    }

    #[test]
    fn prop_validate_agrees_with_errors(instance in simple_object(), bad in any::<bool>()) {
        let mut node = common::build(common::object_simple(), instance);
        if bad {
            node.as_model_mut().unwrap().set("two", json!("not a number"));
        }
        let valid = node.validate();
        prop_assert_eq!(valid, !bad);
        prop_assert_eq!(valid, !node.has_errors());
        prop_assert_eq!(valid, node.as_model().unwrap().invalid_properties().is_empty());
    }

    #[test]
    fn prop_push_and_remove_preserve_order(
        items in proptest::collection::vec(-50i64..50, 0..8),
        extra in -50i64..50,
        remove_at in 0usize..10,
    ) {
        let mut node = common::build(json!({ "type": "array" }), json!(items));
        let collection = node.as_collection_mut().unwrap();

        let index = collection.push(json!(extra));
        prop_assert_eq!(index, items.len());
        let mut expected: Vec<i64> = items.clone();
        expected.push(extra);
        prop_assert_eq!(collection.to_value(), json!(expected));

        let removed = collection.remove(remove_at);
        if remove_at < expected.len() {
            let gone = expected.remove(remove_at);
            prop_assert_eq!(removed.map(|n| n.to_value()), Some(json!(gone)));
        } else {
            prop_assert!(removed.is_none());
        }
        prop_assert_eq!(collection.to_value(), json!(expected));
    }
}
