//! # Builder
//!
//! Dispatches a schema + instance pair to the node class registered for the
//! coerced instance's kind, and holds the class-level notification channels.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use jsm_core::Kind;
use jsm_schema::Schema;

use crate::event::{Channel, Event};
use crate::node::Node;
use crate::registry::{NodeClass, TypeRegistry};

#[derive(Default)]
struct Inner {
    registry: TypeRegistry,
    accessors: Channel,
    models: Channel,
    collections: Channel,
}

/// Shared builder handle. Clones share the registry and the class channels.
#[derive(Clone, Default)]
pub struct Builder {
    inner: Arc<Inner>,
}

impl Builder {
    /// A builder dispatching through `registry`.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                ..Inner::default()
            }),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    /// The class-level channel for `class`.
    pub fn channel(&self, class: NodeClass) -> &Channel {
        match class {
            NodeClass::Accessor => &self.inner.accessors,
            NodeClass::Model => &self.inner.models,
            NodeClass::Collection => &self.inner.collections,
        }
    }

    /// Subscribe to `event` on every node of `class` built by this builder.
    pub fn on_type<F>(&self, class: NodeClass, event: impl Into<String>, listener: F)
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.channel(class).on(event, listener);
    }

    /// The class a node for `value` is built as.
    pub fn class_for(&self, value: &Value) -> NodeClass {
        self.inner.registry.class_for(Kind::of(value))
    }

    /// Build a node tree for `instance`.
    ///
    /// Returns `None` without a schema: dispatch needs one.
    pub fn build(&self, schema: Option<&Schema>, instance: Value) -> Option<Node> {
        let Some(schema) = schema else {
            tracing::debug!("no schema given, nothing to build");
            return None;
        };
        Some(self.build_node(schema, instance))
    }

    /// Build a node tree for `instance` under `schema`.
    ///
    /// The instance is coerced first. When coercion yields nothing usable
    /// the raw instance is built instead, so this never fails.
    pub fn build_node(&self, schema: &Schema, instance: Value) -> Node {
        let coerced = schema.bind(&instance).coerce();
        let coerced = match coerced {
            Some(value) => value,
            None => {
                tracing::debug!(
                    pointer = ?schema.pointer(),
                    kind = %Kind::of(&instance),
                    "instance could not be coerced, building it as given"
                );
                instance
            }
        };

        let class = self.class_for(&coerced);
        tracing::trace!(pointer = ?schema.pointer(), %class, "dispatching node");

        let mut node = Node::empty(class, schema.clone(), self.clone());
        node.build(coerced);
        node
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_schema_builds_nothing() {
        assert!(Builder::default().build(None, json!({"a": 1})).is_none());
    }

    #[test]
    fn dispatches_by_kind() {
        let builder = Builder::default();
        let schema = Schema::new(json!({}));
        assert_eq!(builder.build_node(&schema, json!({})).class(), NodeClass::Model);
        assert_eq!(builder.build_node(&schema, json!([])).class(), NodeClass::Collection);
        assert_eq!(builder.build_node(&schema, json!("s")).class(), NodeClass::Accessor);
        assert_eq!(builder.build_node(&schema, Value::Null).class(), NodeClass::Accessor);
    }

    #[test]
    fn empty_registry_builds_accessors_for_containers() {
        let builder = Builder::new(TypeRegistry::new());
        let node = builder.build_node(&Schema::new(json!({})), json!({"a": [1]}));
        assert_eq!(node.class(), NodeClass::Accessor);
        assert_eq!(node.to_value(), json!({"a": [1]}));
    }

    #[test]
    fn dispatch_uses_coerced_instance() {
        let schema = Schema::new(json!({"type": "object", "default": {"one": 1}}));
        let node = Builder::default().build(Some(&schema), Value::Null).unwrap();
        assert_eq!(node.class(), NodeClass::Model);
        assert_eq!(node.to_value(), json!({"one": 1}));
    }

    #[test]
    fn failed_coercion_falls_back_to_raw_instance() {
        let schema = Schema::new(json!({"type": "number"}));
        let node = Builder::default().build_node(&schema, json!({"bug": "happy"}));
        assert_eq!(node.class(), NodeClass::Model);
        assert_eq!(node.to_value(), json!({"bug": "happy"}));
    }

    #[test]
    fn building_twice_gives_independent_equal_trees() {
        let builder = Builder::default();
        let schema = Schema::new(json!({"type": "object"}));
        let instance = json!({"a": {"b": [1, 2]}});
        let mut first = builder.build_node(&schema, instance.clone());
        let second = builder.build_node(&schema, instance.clone());
        assert_eq!(first.to_value(), second.to_value());

        first.as_model_mut().unwrap().set("a", json!(0));
        assert_eq!(second.to_value(), instance);
    }
}
