//! # Error Store
//!
//! Validation errors held by a container node. Node-local errors and child
//! errors never mix: an error addressed to an existing child goes to that
//! child's own store. The keyed map only holds errors addressed to a key
//! for which no child exists, such as a missing required property; those
//! are recorded locally as well, so a node that failed validation always
//! reports at least one local or child error.

use std::collections::BTreeMap;

use jsm_schema::Assertion;

/// Per-node error store, keyed by property name or item index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorStore<K: Ord> {
    local: Vec<Assertion>,
    keyed: BTreeMap<K, Vec<Assertion>>,
}

impl<K: Ord> ErrorStore<K> {
    pub fn new() -> Self {
        Self {
            local: Vec::new(),
            keyed: BTreeMap::new(),
        }
    }

    /// Record an error about the node itself.
    pub fn add(&mut self, assertion: Assertion) {
        self.local.push(assertion);
    }

    /// Record an error addressed to `key` when no child exists there.
    pub fn add_detached(&mut self, key: K, assertion: Assertion) {
        self.local.push(assertion.clone());
        self.keyed.entry(key).or_default().push(assertion);
    }

    /// Drop the errors recorded under `key`, and their local copies.
    ///
    /// Called when a child is installed at `key`: from then on errors about
    /// it belong to the child.
    pub fn forget(&mut self, key: &K) {
        let Some(detached) = self.keyed.remove(key) else {
            return;
        };
        for assertion in &detached {
            if let Some(i) = self.local.iter().position(|a| a == assertion) {
                self.local.remove(i);
            }
        }
    }

    pub fn local(&self) -> &[Assertion] {
        &self.local
    }

    /// Errors recorded under `key` by [`add_detached`](Self::add_detached).
    pub fn keyed(&self, key: &K) -> &[Assertion] {
        self.keyed.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keyed.keys()
    }

    pub fn clear(&mut self) {
        self.local.clear();
        self.keyed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Number of node-local errors (detached errors included).
    pub fn len(&self) -> usize {
        self.local.len()
    }
}

impl<K: Ord> Default for ErrorStore<K> {
    fn default() -> Self {
        Self::new()
    }
}
