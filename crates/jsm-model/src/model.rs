//! # Model
//!
//! Object node: named child nodes in insertion order. Each child is built
//! from the sub-schema resolved for its key against the model's coerced
//! instance, or an open schema when nothing in the parent covers the key.

use serde_json::{Map, Value};

use jsm_core::{Kind, PathSegment};
use jsm_schema::{Assertion, Schema};

use crate::builder::Builder;
use crate::error_store::ErrorStore;
use crate::event::{names, Event};
use crate::node::{Node, NodeCore, NodeState};
use crate::registry::NodeClass;
use crate::validation::{self, Validatable};

#[derive(Debug)]
pub struct Model {
    pub(crate) core: NodeCore,
    properties: Vec<(String, Node)>,
    errors: ErrorStore<String>,
}

impl Model {
    /// An unbuilt, empty model governed by `schema`.
    pub fn new(schema: Schema, builder: Builder) -> Self {
        Self::with_core(NodeCore::new(schema, builder))
    }

    pub(crate) fn with_core(core: NodeCore) -> Self {
        Self {
            core,
            properties: Vec::new(),
            errors: ErrorStore::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.core.schema
    }

    pub fn state(&self) -> NodeState {
        self.core.state
    }

    /// Discard every property and rebuild one child per key of `instance`.
    ///
    /// Anything but an object leaves the model empty.
    pub fn build(&mut self, instance: Value) -> &mut Self {
        self.properties.clear();
        self.errors.clear();
        self.core.state = NodeState::Built;

        let snapshot = match instance {
            Value::Object(map) => Value::Object(map),
            other => {
                if is_truthy(&other) {
                    tracing::warn!(kind = %Kind::of(&other), "model built from a non-object instance, left empty");
                }
                self.emit(names::CHANGED, &Event::Changed);
                return self;
            }
        };

        let schema = self.core.schema.clone();
        let builder = self.core.builder.clone();
        let correlation = schema.bind(&snapshot);
        if let Value::Object(map) = &snapshot {
            for (key, value) in map {
                let child_schema = correlation
                    .subschema(&PathSegment::from(key.as_str()))
                    .unwrap_or_else(|| schema.open());
                tracing::trace!(key = %key, pointer = ?child_schema.pointer(), "building property");
                let child = builder.build_node(&child_schema, value.clone());
                self.properties.push((key.clone(), child));
            }
        }

        self.emit(names::CHANGED, &Event::Changed);
        self
    }

    /// Same as [`build`](Self::build): replace the whole model.
    pub fn rebuild(&mut self, instance: Value) -> &mut Self {
        self.build(instance)
    }

    /// Build `value` as the child at `key`, replacing any existing child.
    ///
    /// The sub-schema is resolved against the model's current value. Emits
    /// `change` and `change:<key>` with the previous and new values.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        let key = key.into();
        let schema = self.core.schema.clone();
        let current = self.to_value();
        let child_schema = schema
            .bind(&current)
            .subschema(&PathSegment::from(key.as_str()))
            .unwrap_or_else(|| schema.open());
        let child = self.core.builder.build_node(&child_schema, value);
        let new_value = child.to_value();

        let previous = match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, child).to_value()),
            None => {
                self.properties.push((key.clone(), child));
                None
            }
        };
        self.errors.forget(&key);
        self.core.state = NodeState::Built;

        let event = Event::PropertyChanged {
            key: &key,
            previous: previous.as_ref(),
            current: &new_value,
        };
        self.emit(names::CHANGE, &event);
        self.emit(&names::change_of(&key), &event);
        self
    }

    /// The value of the child at `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.child(key).map(Node::to_value)
    }

    pub fn child(&self, key: &str) -> Option<&Node> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.properties
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// Whether a child exists at `key`.
    pub fn has(&self, key: &str) -> bool {
        self.child(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.properties.iter().map(|(k, node)| (k.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Reconstruct the object from every child's value.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (key, node) in &self.properties {
            map.insert(key.clone(), node.to_value());
        }
        Value::Object(map)
    }

    pub fn validate(&mut self) -> bool {
        validation::validate(self)
    }

    /// Node-local errors.
    pub fn errors(&self) -> &[Assertion] {
        self.errors.local()
    }

    /// Errors for `key`: the whole subtree of the child there, or the
    /// errors recorded under the key when it has no child.
    pub fn errors_at(&self, key: &str) -> Vec<Assertion> {
        match self.child(key) {
            Some(child) => child.subtree_errors(),
            None => self.errors.keyed(&key.to_string()).to_vec(),
        }
    }

    /// Record an error on the child at `key` when it exists, otherwise on
    /// the model itself (and under `key`, when one is given).
    pub fn add_error(&mut self, assertion: Assertion, key: Option<&str>) {
        match key {
            None => self.errors.add(assertion),
            Some(key) => match self.child_mut(key) {
                Some(child) => child.add_error(assertion),
                None => self.errors.add_detached(key.to_string(), assertion),
            },
        }
    }

    pub fn reset_errors(&mut self) {
        self.errors.clear();
        for (_, child) in &mut self.properties {
            child.reset_errors();
        }
    }

    /// Keys whose subtree holds errors, followed by keys with no child
    /// that had errors addressed to them.
    pub fn invalid_properties(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .properties
            .iter()
            .filter(|(_, node)| node.has_errors())
            .map(|(k, _)| k.clone())
            .collect();
        for key in self.errors.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }

    fn emit(&self, name: &str, event: &Event<'_>) {
        self.core.emit(NodeClass::Model, name, event);
    }
}

impl Validatable for Model {
    const CLASS: NodeClass = NodeClass::Model;

    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn snapshot(&self) -> Value {
        self.to_value()
    }

    fn reset(&mut self) {
        self.reset_errors();
    }

    fn attach(&mut self, assertion: Assertion, depth: usize) {
        let segment = assertion.instance_path.segments().get(depth).cloned();
        match segment {
            Some(PathSegment::Property(key)) => match self.child_mut(&key) {
                Some(child) => child.attach(assertion, depth + 1),
                None => self.errors.add_detached(key, assertion.rebase(depth)),
            },
            Some(PathSegment::Index(i)) => {
                // An index into an object cannot come from a valid walk;
                // keep it under its string form.
                self.errors.add_detached(i.to_string(), assertion.rebase(depth));
            }
            None => self.errors.add(assertion.rebase(depth)),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
