//! # Type Registry
//!
//! Maps a runtime [`Kind`] to the [`NodeClass`] the builder instantiates for
//! it. Kinds with no entry are built as accessors.
//!
//! The registry is an ordinary value owned by a [`Builder`](crate::Builder),
//! so trees built under different registries never influence each other.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use jsm_core::Kind;

/// The node variants a registry entry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeClass {
    Accessor,
    Model,
    Collection,
}

impl NodeClass {
    /// Whether nodes of this class can hold values of `kind`.
    ///
    /// Models need objects and collections need arrays; an accessor can
    /// wrap anything.
    pub fn accepts(self, kind: Kind) -> bool {
        match self {
            NodeClass::Accessor => true,
            NodeClass::Model => kind == Kind::Object,
            NodeClass::Collection => kind == Kind::Array,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeClass::Accessor => "accessor",
            NodeClass::Model => "model",
            NodeClass::Collection => "collection",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error registering a node class.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The kind name is not one of the six JSON kinds.
    #[error("unknown value kind '{0}'")]
    UnknownKind(String),

    /// The class cannot hold values of the kind.
    #[error("{class} nodes cannot be registered for {kind} values")]
    Incompatible {
        /// Kind the registration was attempted for.
        kind: Kind,
        /// Class that was rejected.
        class: NodeClass,
    },
}

/// Kind → node class table.
///
/// `TypeRegistry::default()` is seeded with `object → Model` and
/// `array → Collection`; `TypeRegistry::new()` starts empty, which makes
/// every node an accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    entries: BTreeMap<Kind, NodeClass>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `class` for `kind`, returning the class it replaces.
    pub fn register(
        &mut self,
        kind: Kind,
        class: NodeClass,
    ) -> Result<Option<NodeClass>, RegistryError> {
        if !class.accepts(kind) {
            return Err(RegistryError::Incompatible { kind, class });
        }
        Ok(self.entries.insert(kind, class))
    }

    /// Register by kind name (`"object"`, `"array"`, `"string"`, ...).
    pub fn register_name(
        &mut self,
        kind: &str,
        class: NodeClass,
    ) -> Result<Option<NodeClass>, RegistryError> {
        let kind = kind
            .parse::<Kind>()
            .map_err(|_| RegistryError::UnknownKind(kind.to_string()))?;
        self.register(kind, class)
    }

    /// Remove the entry for `kind`; its values become accessors.
    pub fn unregister(&mut self, kind: Kind) -> Option<NodeClass> {
        self.entries.remove(&kind)
    }

    pub fn lookup(&self, kind: Kind) -> Option<NodeClass> {
        self.entries.get(&kind).copied()
    }

    /// Look up by kind name. Unknown names have no entry.
    pub fn lookup_name(&self, kind: &str) -> Option<NodeClass> {
        kind.parse::<Kind>().ok().and_then(|k| self.lookup(k))
    }

    /// The class for `kind`, falling back to [`NodeClass::Accessor`].
    pub fn class_for(&self, kind: Kind) -> NodeClass {
        self.lookup(kind).unwrap_or(NodeClass::Accessor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Kind, NodeClass)> + '_ {
        self.entries.iter().map(|(k, c)| (*k, *c))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(Kind::Object, NodeClass::Model);
        entries.insert(Kind::Array, NodeClass::Collection);
        Self { entries }
    }
}
