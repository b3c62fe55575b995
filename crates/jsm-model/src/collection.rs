//! # Collection
//!
//! Array node: ordered, index-addressed child nodes. Each item is built
//! from the sub-schema resolved for its index against the collection's
//! current value.

use serde_json::Value;

use jsm_core::{Kind, PathSegment};
use jsm_schema::{Assertion, Schema};

use crate::builder::Builder;
use crate::error_store::ErrorStore;
use crate::event::{names, Event};
use crate::node::{Node, NodeCore, NodeState};
use crate::registry::NodeClass;
use crate::validation::{self, Validatable};

#[derive(Debug)]
pub struct Collection {
    pub(crate) core: NodeCore,
    items: Vec<Node>,
    errors: ErrorStore<usize>,
}

impl Collection {
    /// An unbuilt, empty collection governed by `schema`.
    pub fn new(schema: Schema, builder: Builder) -> Self {
        Self::with_core(NodeCore::new(schema, builder))
    }

    pub(crate) fn with_core(core: NodeCore) -> Self {
        Self {
            core,
            items: Vec::new(),
            errors: ErrorStore::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.core.schema
    }

    pub fn state(&self) -> NodeState {
        self.core.state
    }

    /// Discard every item and rebuild one per element of `instance`,
    /// emitting `added` for each. Anything but an array leaves the
    /// collection empty.
    pub fn build(&mut self, instance: Value) -> &mut Self {
        self.items.clear();
        self.errors.clear();
        self.core.state = NodeState::Built;

        let snapshot = match instance {
            Value::Array(items) => Value::Array(items),
            Value::Null => Value::Array(Vec::new()),
            other => {
                tracing::warn!(kind = %Kind::of(&other), "collection built from a non-array instance, left empty");
                Value::Array(Vec::new())
            }
        };

        let schema = self.core.schema.clone();
        let builder = self.core.builder.clone();
        let correlation = schema.bind(&snapshot);
        if let Value::Array(values) = &snapshot {
            for (index, value) in values.iter().enumerate() {
                let item_schema = correlation
                    .subschema(&PathSegment::Index(index))
                    .unwrap_or_else(|| schema.open());
                tracing::trace!(index, pointer = ?item_schema.pointer(), "building item");
                self.items.push(builder.build_node(&item_schema, value.clone()));
                self.emit_added(index);
            }
        }

        self.emit(names::CHANGED, &Event::Changed);
        self
    }

    /// Append `value` as a new item, returning its index.
    ///
    /// The sub-schema for the next index is resolved against the
    /// collection's current value.
    pub fn push(&mut self, value: Value) -> usize {
        let index = self.items.len();
        let schema = self.core.schema.clone();
        let current = self.to_value();
        let item_schema = schema
            .bind(&current)
            .subschema(&PathSegment::Index(index))
            .unwrap_or_else(|| schema.open());
        let item = self.core.builder.build_node(&item_schema, value);
        self.items.push(item);
        self.errors.forget(&index);
        self.core.state = NodeState::Built;
        self.emit_added(index);
        index
    }

    /// Same as [`push`](Self::push).
    pub fn add(&mut self, value: Value) -> usize {
        self.push(value)
    }

    /// Remove and return the item at `index`, shifting later items down.
    ///
    /// `removed` is emitted whether or not an item existed there.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        let removed = (index < self.items.len()).then(|| self.items.remove(index));
        if removed.is_some() {
            self.core.state = NodeState::Built;
        }
        self.emit(
            names::REMOVED,
            &Event::Removed {
                index,
                node: removed.as_ref(),
            },
        );
        removed
    }

    pub fn has(&self, index: usize) -> bool {
        index < self.items.len()
    }

    #[doc(alias = "length")]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The value of the item at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.get(index).map(Node::to_value)
    }

    /// The item node at `index`.
    pub fn get_model(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn get_model_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.items.iter_mut()
    }

    /// Reconstruct the array from every item's value, in index order.
    pub fn to_value(&self) -> Value {
        Value::Array(self.items.iter().map(Node::to_value).collect())
    }

    pub fn validate(&mut self) -> bool {
        validation::validate(self)
    }

    /// Node-local errors.
    pub fn errors(&self) -> &[Assertion] {
        self.errors.local()
    }

    /// Errors for `index`: the whole subtree of the item there, or the
    /// errors recorded under the index when it has no item.
    pub fn errors_at(&self, index: usize) -> Vec<Assertion> {
        match self.items.get(index) {
            Some(item) => item.subtree_errors(),
            None => self.errors.keyed(&index).to_vec(),
        }
    }

    /// Record an error on the item at `index` when it exists, otherwise on
    /// the collection itself (and under `index`, when one is given).
    pub fn add_error(&mut self, assertion: Assertion, index: Option<usize>) {
        match index {
            None => self.errors.add(assertion),
            Some(index) => match self.items.get_mut(index) {
                Some(item) => item.add_error(assertion),
                None => self.errors.add_detached(index, assertion),
            },
        }
    }

    pub fn reset_errors(&mut self) {
        self.errors.clear();
        for item in &mut self.items {
            item.reset_errors();
        }
    }

    /// Indices whose subtree holds errors, followed by indices with no item
    /// that had errors addressed to them.
    pub fn invalid_items(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.has_errors())
            .map(|(i, _)| i)
            .collect();
        for index in self.errors.keys() {
            if !indices.contains(index) {
                indices.push(*index);
            }
        }
        indices
    }

    fn emit_added(&self, index: usize) {
        if let Some(node) = self.items.get(index) {
            self.emit(names::ADDED, &Event::Added { index, node });
        }
    }

    fn emit(&self, name: &str, event: &Event<'_>) {
        self.core.emit(NodeClass::Collection, name, event);
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Validatable for Collection {
    const CLASS: NodeClass = NodeClass::Collection;

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
            Some(PathSegment::Index(index)) => match self.items.get_mut(index) {
                Some(item) => item.attach(assertion, depth + 1),
                None => self.errors.add_detached(index, assertion.rebase(depth)),
            },
            Some(PathSegment::Property(_)) | None => self.errors.add(assertion.rebase(depth)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(schema: Value, instance: Value) -> Collection {
        let mut c = Collection::new(Schema::new(schema), Builder::default());
        c.build(instance);
        c
    }

    #[test]
    fn items_get_their_index_schema() {
        let c = collection(
            json!({"items": [{"type": "string"}], "additionalItems": {"type": "object"}}),
            json!(["a", {"b": 1}]),
        );
        assert_eq!(c.len(), 2);
        assert_eq!(c.get_model(0).unwrap().class(), NodeClass::Accessor);
        assert_eq!(c.get_model(1).unwrap().class(), NodeClass::Model);
        assert_eq!(c.get_model(1).unwrap().schema().pointer(), Some("/additionalItems"));
    }

    #[test]
    fn push_appends_without_reordering() {
        let mut c = collection(json!({}), json!([1, 2]));
        assert_eq!(c.push(json!(3)), 2);
        assert_eq!(c.add(json!(4)), 3);
        assert_eq!(c.to_value(), json!([1, 2, 3, 4]));
    }

    #[test]
    fn remove_shifts_later_items() {
        let mut c = collection(json!({}), json!(["a", "b", "c"]));
        let removed = c.remove(1).unwrap();
        assert_eq!(removed.to_value(), json!("b"));
        assert_eq!(c.to_value(), json!(["a", "c"]));
        assert!(c.remove(7).is_none());
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn iteration_matches_indexed_get() {
        let c = collection(json!({}), json!([10, 20, 30]));
        let iter = c.iter();
        assert_eq!(iter.len(), c.len());
        for (i, item) in (&c).into_iter().enumerate() {
            assert_eq!(Some(item.to_value()), c.get(i));
        }
    }

    #[test]
    fn missing_index_errors_are_kept_under_the_index() {
        let mut c = collection(json!({}), json!([1]));
        c.add_error(Assertion::new("item 0"), Some(0));
        c.add_error(Assertion::new("item 5"), Some(5));
        assert_eq!(c.errors().len(), 1);
        assert_eq!(c.errors_at(0).len(), 1);
        assert_eq!(c.errors_at(5).len(), 1);
        assert_eq!(c.invalid_items(), vec![0, 5]);
    }

    #[test]
    fn collection_level_assertions_stay_local() {
        let mut c = collection(json!({"type": "array", "maxItems": 1}), json!([1, 2]));
        assert!(!c.validate());
        assert_eq!(c.errors().len(), 1);
        assert!(c.invalid_items().is_empty());
    }

    #[test]
    fn push_clears_errors_recorded_for_its_index() {
        let mut c = collection(json!({}), json!([1]));
        c.add_error(Assertion::new("item 1 missing"), Some(1));
        assert_eq!(c.invalid_items(), vec![1]);

        assert_eq!(c.push(json!(2)), 1);
        assert!(c.invalid_items().is_empty());
        assert!(c.errors_at(1).is_empty());
        assert!(c.errors().is_empty());
    }
}
