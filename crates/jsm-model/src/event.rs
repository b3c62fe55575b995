//! # Change Notifications
//!
//! A [`Channel`] is a list of named listeners invoked synchronously, in
//! registration order. Each node owns one channel; the [`Builder`] owns one
//! more per [`NodeClass`] so application code can observe every node of a
//! class at once. Emission always reaches the node's channel first and the
//! class channel second.
//!
//! [`Builder`]: crate::Builder
//! [`NodeClass`]: crate::NodeClass

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::node::Node;

/// Event names emitted by nodes and by the hypermedia layer.
pub mod names {
    /// A node finished (re)building.
    pub const CHANGED: &str = "changed";
    /// One property of a model was set.
    pub const CHANGE: &str = "change";
    /// An item was appended to a collection.
    pub const ADDED: &str = "added";
    /// An item removal was attempted on a collection.
    pub const REMOVED: &str = "removed";
    /// A node finished validating.
    pub const VALIDATED: &str = "validated";

    /// The property-scoped name emitted alongside [`CHANGE`].
    pub fn change_of(key: &str) -> String {
        format!("{CHANGE}:{key}")
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Changed,
    PropertyChanged {
        key: &'a str,
        /// `None` when the property did not exist before.
        previous: Option<&'a Value>,
        current: &'a Value,
    },
    Added {
        index: usize,
        node: &'a Node,
    },
    /// `node` is `None` when nothing existed at `index`.
    Removed {
        index: usize,
        node: Option<&'a Node>,
    },
    Validated(bool),
    /// An I/O action started or finished on `node`.
    Lifecycle {
        node: &'a Node,
    },
}

type Listener = Arc<dyn Fn(&Event<'_>) + Send + Sync>;

/// Named listener list.
#[derive(Default)]
pub struct Channel {
    listeners: RwLock<Vec<(String, Listener)>>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to events emitted under `name`.
    pub fn on<F>(&self, name: impl Into<String>, listener: F)
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.listeners.write().push((name.into(), Arc::new(listener)));
    }

    /// Remove every listener subscribed under `name`, returning how many
    /// were removed.
    pub fn off(&self, name: &str) -> usize {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(n, _)| n != name);
        before - listeners.len()
    }

    /// Invoke the listeners subscribed under `name`.
    ///
    /// The listener list is snapshotted first, so listeners may subscribe
    /// or unsubscribe while being invoked.
    pub fn emit(&self, name: &str, event: &Event<'_>) {
        let matching: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in matching {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
