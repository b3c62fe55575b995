//! Shared schema and instance fixtures.

#![allow(dead_code)]

use jsm_model::{Builder, Node, Schema};
use serde_json::{json, Value};

pub fn object_simple() -> Value {
    json!({
        "type": "object",
        "properties": {
            "one": { "type": "string" },
            "two": { "type": "number" },
            "three": { "type": "boolean" }
        }
    })
}

pub fn object_defaults() -> Value {
    json!({
        "type": "object",
        "default": { "one": "default", "three": true },
        "properties": {
            "one": { "type": "string" },
            "two": { "type": "number" },
            "three": { "type": "boolean" }
        }
    })
}

pub fn array_simple() -> Value {
    json!({ "type": "array", "items": object_simple() })
}

pub fn array_defaults() -> Value {
    json!({ "type": "array", "items": object_defaults() })
}

/// Object schema whose `four` property is itself an object with defaults.
pub fn nested_defaults() -> Value {
    json!({
        "type": "object",
        "properties": {
            "one": { "type": "string" },
            "two": { "type": "number" },
            "three": { "type": "boolean" },
            "four": object_defaults()
        }
    })
}

pub fn combo() -> Value {
    json!({
        "type": "object",
        "properties": {
            "one": { "oneOf": [ { "type": "string" }, { "type": "object" } ] }
        }
    })
}

/// At most one property, and it must be `one` or `two`.
pub fn combo_top() -> Value {
    json!({
        "type": "object",
        "properties": object_simple()["properties"].clone(),
        "maxProperties": 1,
        "anyOf": [ { "required": ["one"] }, { "required": ["two"] } ]
    })
}

pub fn contact() -> Value {
    json!({
        "type": "object",
        "default": { "name": null, "email": null, "phone": null },
        "required": ["name", "email"],
        "properties": {
            "name":  { "type": "string", "minLength": 2 },
            "email": { "type": "string", "default": null, "format": "email" },
            "phone": { "type": ["string", "null"], "pattern": "^[0-9\\-\\.\\s\\(\\)]+$" }
        }
    })
}

pub fn build(schema: Value, instance: Value) -> Node {
    Builder::default()
        .build(Some(&Schema::new(schema)), instance)
        .expect("schema given, node expected")
}
