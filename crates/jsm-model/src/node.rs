//! # Nodes
//!
//! [`Node`] is the closed union of the three node classes. Everything a
//! caller can do without knowing the class lives here; class-specific
//! operations are reached through [`Node::as_model_mut`] and friends.
//!
//! ## State
//!
//! ```text
//! Unbuilt ──build──▶ Built ──validate──▶ Valid | Invalid
//!                      ▲                        │
//!                      └──────build / set───────┘
//! ```

use std::fmt;

use serde_json::Value;

use jsm_core::PathSegment;
use jsm_schema::{Assertion, Schema};

use crate::accessor::Accessor;
use crate::builder::Builder;
use crate::collection::Collection;
use crate::event::{Channel, Event};
use crate::model::Model;
use crate::registry::NodeClass;
use crate::validation::Validatable;

/// Where a node is in its build / validate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Constructed but never built.
    Unbuilt,
    /// Built or mutated since the last validation.
    Built,
    /// The last validation passed.
    Valid,
    /// The last validation failed.
    Invalid,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unbuilt => "unbuilt",
            Self::Built => "built",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        };
        f.write_str(s)
    }
}

/// State shared by every node class.
#[derive(Debug)]
pub(crate) struct NodeCore {
    pub(crate) schema: Schema,
    pub(crate) builder: Builder,
    pub(crate) events: Channel,
    pub(crate) state: NodeState,
}

impl NodeCore {
    pub(crate) fn new(schema: Schema, builder: Builder) -> Self {
        Self {
            schema,
            builder,
            events: Channel::new(),
            state: NodeState::Unbuilt,
        }
    }

    /// Deliver to the node's channel, then to the class channel.
    pub(crate) fn emit(&self, class: NodeClass, name: &str, event: &Event<'_>) {
        self.events.emit(name, event);
        self.builder.channel(class).emit(name, event);
    }

    /// Move the node-level parts into a fresh core, leaving an empty
    /// channel behind.
    fn take(&mut self) -> NodeCore {
        NodeCore {
            schema: self.schema.clone(),
            builder: self.builder.clone(),
            events: std::mem::take(&mut self.events),
            state: self.state,
        }
    }
}

/// A node of a built tree.
#[derive(Debug)]
pub enum Node {
    Accessor(Accessor),
    Model(Model),
    Collection(Collection),
}

impl Node {
    /// An unbuilt node of `class`.
    pub(crate) fn empty(class: NodeClass, schema: Schema, builder: Builder) -> Self {
        Self::with_core(class, NodeCore::new(schema, builder))
    }

    fn with_core(class: NodeClass, core: NodeCore) -> Self {
        match class {
            NodeClass::Accessor => Node::Accessor(Accessor::with_core(core)),
            NodeClass::Model => Node::Model(Model::with_core(core)),
            NodeClass::Collection => Node::Collection(Collection::with_core(core)),
        }
    }

    fn core(&self) -> &NodeCore {
        match self {
            Node::Accessor(n) => &n.core,
            Node::Model(n) => &n.core,
            Node::Collection(n) => &n.core,
        }
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        match self {
            Node::Accessor(n) => &mut n.core,
            Node::Model(n) => &mut n.core,
            Node::Collection(n) => &mut n.core,
        }
    }

    pub fn class(&self) -> NodeClass {
        match self {
            Node::Accessor(_) => NodeClass::Accessor,
            Node::Model(_) => NodeClass::Model,
            Node::Collection(_) => NodeClass::Collection,
        }
    }

    /// The sub-schema governing this node.
    pub fn schema(&self) -> &Schema {
        &self.core().schema
    }

    pub fn state(&self) -> NodeState {
        self.core().state
    }

    pub fn builder(&self) -> &Builder {
        &self.core().builder
    }

    /// The node's own notification channel.
    pub fn events(&self) -> &Channel {
        &self.core().events
    }

    /// Materialize the node's current value.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Accessor(n) => n.get().clone(),
            Node::Model(n) => n.to_value(),
            Node::Collection(n) => n.to_value(),
        }
    }

    /// Rebuild from `instance`, without coercion.
    ///
    /// When the builder's registry maps `instance` to a different class the
    /// node changes class, keeping its schema and its listeners. A `null`
    /// instance keeps the current class, so containers simply empty.
    pub fn build(&mut self, instance: Value) -> &mut Self {
        let target = self.builder().class_for(&instance);
        if target != self.class() && !instance.is_null() {
            tracing::debug!(from = %self.class(), to = %target, "instance kind changed, node changes class");
            let core = self.core_mut().take();
            *self = Node::with_core(target, core);
        }
        match self {
            Node::Accessor(n) => {
                n.build(instance);
            }
            Node::Model(n) => {
                n.build(instance);
            }
            Node::Collection(n) => {
                n.build(instance);
            }
        }
        self
    }

    /// Replace the governing schema, coerce `instance` under it and rebuild.
    pub fn rebuild_from(&mut self, schema: Schema, instance: Value) -> &mut Self {
        let coerced = schema.bind(&instance).coerce();
        let coerced = coerced.unwrap_or(instance);
        self.core_mut().schema = schema;
        self.build(coerced)
    }

    /// Validate the subtree, attaching errors where they occurred.
    ///
    /// A node that was never built is vacuously valid.
    pub fn validate(&mut self) -> bool {
        match self {
            Node::Accessor(n) => n.validate(),
            Node::Model(n) => n.validate(),
            Node::Collection(n) => n.validate(),
        }
    }

    /// Node-local errors.
    pub fn errors(&self) -> &[Assertion] {
        match self {
            Node::Accessor(n) => n.errors(),
            Node::Model(n) => n.errors(),
            Node::Collection(n) => n.errors(),
        }
    }

    /// Every error in the subtree, this node's first.
    pub fn subtree_errors(&self) -> Vec<Assertion> {
        let mut all = self.errors().to_vec();
        for child in self.children() {
            all.extend(child.subtree_errors());
        }
        all
    }

    /// Record a node-local error.
    pub fn add_error(&mut self, assertion: Assertion) {
        match self {
            Node::Accessor(n) => n.add_error(assertion),
            Node::Model(n) => n.add_error(assertion, None),
            Node::Collection(n) => n.add_error(assertion, None),
        }
    }

    /// Clear this node's errors and every descendant's.
    pub fn reset_errors(&mut self) {
        match self {
            Node::Accessor(n) => n.reset_errors(),
            Node::Model(n) => n.reset_errors(),
            Node::Collection(n) => n.reset_errors(),
        }
    }

    /// Whether any node in the subtree holds an error.
    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty() || self.children().any(Node::has_errors)
    }

    /// Number of errors held in the subtree.
    pub fn error_count(&self) -> usize {
        self.errors().len() + self.children().map(Node::error_count).sum::<usize>()
    }

    /// Subscribe to `event` on this node only.
    pub fn on<F>(&self, event: impl Into<String>, listener: F)
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.events().on(event, listener);
    }

    /// Emit on this node's channel, then on its class channel.
    pub fn emit(&self, name: &str, event: &Event<'_>) {
        self.core().emit(self.class(), name, event);
    }

    /// Direct children, in key or index order.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        match self {
            Node::Accessor(_) => Box::new(std::iter::empty()),
            Node::Model(n) => Box::new(n.iter().map(|(_, child)| child)),
            Node::Collection(n) => Box::new(n.iter()),
        }
    }

    /// The descendant at `path`, if every step exists.
    pub fn at(&self, path: &[PathSegment]) -> Option<&Node> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self);
        };
        let child = match (self, head) {
            (Node::Model(m), PathSegment::Property(key)) => m.child(key)?,
            (Node::Collection(c), PathSegment::Index(i)) => c.get_model(*i)?,
            _ => return None,
        };
        child.at(rest)
    }

    pub fn at_mut(&mut self, path: &[PathSegment]) -> Option<&mut Node> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self);
        };
        let child = match (self, head) {
            (Node::Model(m), PathSegment::Property(key)) => m.child_mut(key)?,
            (Node::Collection(c), PathSegment::Index(i)) => c.get_model_mut(*i)?,
            _ => return None,
        };
        child.at_mut(rest)
    }

    /// Attach `assertion` at the deepest existing node along its path,
    /// starting `depth` segments in.
    pub(crate) fn attach(&mut self, assertion: Assertion, depth: usize) {
        match self {
            Node::Accessor(n) => n.add_error(assertion.rebase(depth)),
            Node::Model(n) => n.attach(assertion, depth),
            Node::Collection(n) => n.attach(assertion, depth),
        }
    }

    pub fn as_accessor(&self) -> Option<&Accessor> {
        match self {
            Node::Accessor(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_accessor_mut(&mut self) -> Option<&mut Accessor> {
        match self {
            Node::Accessor(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Node::Model(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_model_mut(&mut self) -> Option<&mut Model> {
        match self {
            Node::Model(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Node::Collection(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            Node::Collection(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Accessor> for Node {
    fn from(n: Accessor) -> Self {
        Node::Accessor(n)
    }
}

impl From<Model> for Node {
    fn from(n: Model) -> Self {
        Node::Model(n)
    }
}

impl From<Collection> for Node {
    fn from(n: Collection) -> Self {
        Node::Collection(n)
    }
}
