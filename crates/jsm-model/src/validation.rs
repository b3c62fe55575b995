//! The validate-and-attach walk shared by every node class.

use serde_json::Value;

use jsm_schema::Assertion;

use crate::event::{names, Event};
use crate::node::{NodeCore, NodeState};
use crate::registry::NodeClass;

pub(crate) trait Validatable {
    const CLASS: NodeClass;

    fn core(&self) -> &NodeCore;
    fn core_mut(&mut self) -> &mut NodeCore;
    /// The value validated: the node's current materialized state.
    fn snapshot(&self) -> Value;
    /// Clear the node's errors and its descendants'.
    fn reset(&mut self);
    /// Attach an assertion whose first `depth` path segments are consumed.
    fn attach(&mut self, assertion: Assertion, depth: usize);
}

/// Validate `node` against its schema and distribute the failures.
///
/// Errors from a previous run never survive: the subtree is reset before
/// anything is attached.
pub(crate) fn validate<N: Validatable>(node: &mut N) -> bool {
    if node.core().state == NodeState::Unbuilt {
        return true;
    }

    node.reset();
    let snapshot = node.snapshot();
    let schema = node.core().schema.clone();

    let valid = match schema.bind(&snapshot).validate() {
        None => {
            tracing::trace!(class = %N::CLASS, "schema has no validate capability, node treated as valid");
            true
        }
        Some(Ok(())) => true,
        Some(Err(tree)) => {
            tracing::debug!(
                class = %N::CLASS,
                pointer = ?schema.pointer(),
                errors = tree.len(),
                "validation failed"
            );
            for assertion in tree.into_assertions() {
                node.attach(assertion, 0);
            }
            false
        }
    };

    node.core_mut().state = if valid {
        NodeState::Valid
    } else {
        NodeState::Invalid
    };
    node.core()
        .emit(N::CLASS, names::VALIDATED, &Event::Validated(valid));
    valid
}
