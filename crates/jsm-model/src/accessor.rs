//! # Accessor
//!
//! Leaf node holding one value verbatim. Accessors are built for scalars,
//! and for containers whose kind has no registered class.

use serde_json::Value;

use jsm_schema::{Assertion, Schema};

use crate::builder::Builder;
use crate::node::{NodeCore, NodeState};
use crate::registry::NodeClass;
use crate::validation::{self, Validatable};

#[derive(Debug)]
pub struct Accessor {
    pub(crate) core: NodeCore,
    instance: Value,
    errors: Vec<Assertion>,
}

impl Accessor {
    /// An unbuilt accessor governed by `schema`.
    pub fn new(schema: Schema, builder: Builder) -> Self {
        Self::with_core(NodeCore::new(schema, builder))
    }

    pub(crate) fn with_core(core: NodeCore) -> Self {
        Self {
            core,
            instance: Value::Null,
            errors: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.core.schema
    }

    pub fn state(&self) -> NodeState {
        self.core.state
    }

    /// Store `instance` as the node's value and clear its errors.
    pub fn build(&mut self, instance: Value) -> &mut Self {
        self.instance = instance;
        self.errors.clear();
        self.core.state = NodeState::Built;
        self
    }

    /// Same as [`build`](Self::build).
    pub fn set(&mut self, instance: Value) -> &mut Self {
        self.build(instance)
    }

    /// The value last passed to `build` / `set`.
    pub fn get(&self) -> &Value {
        &self.instance
    }

    pub fn to_value(&self) -> Value {
        self.instance.clone()
    }

    pub fn validate(&mut self) -> bool {
        validation::validate(self)
    }

    pub fn errors(&self) -> &[Assertion] {
        &self.errors
    }

    pub fn add_error(&mut self, assertion: Assertion) {
        self.errors.push(assertion);
    }

    pub fn reset_errors(&mut self) {
        self.errors.clear();
    }
}

impl Validatable for Accessor {
    const CLASS: NodeClass = NodeClass::Accessor;

    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn snapshot(&self) -> Value {
        self.instance.clone()
    }

    fn reset(&mut self) {
        self.reset_errors();
    }

    fn attach(&mut self, assertion: Assertion, depth: usize) {
        self.add_error(assertion.rebase(depth));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn accessor(schema: Value) -> Accessor {
        Accessor::new(Schema::new(schema), Builder::default())
    }

    #[test]
    fn get_returns_last_value_verbatim() {
        let mut a = accessor(json!({"type": "string", "default": "d"}));
        a.build(json!("one")).set(json!(2));
        assert_eq!(a.get(), &json!(2));
    }

    #[test]
    fn build_clears_errors() {
        let mut a = accessor(json!({"type": "string"}));
        a.build(json!(1));
        assert!(!a.validate());
        assert_eq!(a.errors().len(), 1);
        a.build(json!("ok"));
        assert!(a.errors().is_empty());
    }

    #[test]
    fn validate_without_capability_is_true() {
        let mut a = Accessor::new(Schema::unvalidated(json!({"type": "string"})), Builder::default());
        a.build(json!(1));
        assert!(a.validate());
        assert_eq!(a.state(), NodeState::Valid);
    }

    #[test]
    fn format_is_validated() {
        let mut a = accessor(json!({"type": "string", "format": "email"}));
        a.build(json!("not an email"));
        assert!(!a.validate());
        a.build(json!("someone@example.com"));
        assert!(a.validate());
    }
}
