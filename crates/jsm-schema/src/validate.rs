//! # Validation Results
//!
//! Translates `jsonschema` errors into [`Assertion`]s located by structured
//! [`InstancePath`]s, and groups them into an [`ErrorTree`] keyed by the
//! child each one belongs to.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;

use jsm_core::{InstancePath, PathSegment};

/// A single failed schema assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// Human-readable description of the failure.
    pub message: String,
    /// Where the failure is, relative to the node holding the assertion.
    pub instance_path: InstancePath,
    /// JSON Pointer of the failing keyword in the schema. Empty for
    /// assertions added by hand.
    pub schema_path: String,
}

impl Assertion {
    /// An assertion about the node it is attached to.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            instance_path: InstancePath::root(),
            schema_path: String::new(),
        }
    }

    pub fn at(mut self, path: InstancePath) -> Self {
        self.instance_path = path;
        self
    }

    /// The same assertion seen from `depth` segments further down its path.
    pub fn rebase(&self, depth: usize) -> Self {
        let segments = self.instance_path.segments();
        let rest = segments.get(depth..).unwrap_or(&[]).to_vec();
        Self {
            message: self.message.clone(),
            instance_path: InstancePath::from(rest),
            schema_path: self.schema_path.clone(),
        }
    }

    fn from_error(error: &ValidationError<'_>, instance: &Value) -> Self {
        let pointer = error.instance_path.to_string();
        let mut instance_path = InstancePath::from_pointer(&pointer, instance).unwrap_or_else(|e| {
            tracing::debug!(pointer = %pointer, error = %e, "unparseable instance path, locating at root");
            InstancePath::root()
        });

        // A missing required property belongs to the property, not its parent.
        if let ValidationErrorKind::Required { property } = &error.kind {
            if let Some(name) = property.as_str() {
                instance_path.push(name);
            }
        }

        Self {
            message: error.to_string(),
            instance_path,
            schema_path: error.schema_path.to_string(),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// The assertions belonging to one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub segment: PathSegment,
    /// Paths are still relative to the parent; the first segment of each
    /// is `segment`.
    pub assertions: Vec<Assertion>,
}

/// Validation failures for one node, split into the node's own failures
/// and per-child branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    assertions: Vec<Assertion>,
    branches: Vec<Branch>,
}

impl ErrorTree {
    /// Group assertions by the first segment of their path. Branch order
    /// follows first appearance.
    pub fn from_assertions(assertions: impl IntoIterator<Item = Assertion>) -> Self {
        let mut tree = ErrorTree::default();
        for assertion in assertions {
            let Some(segment) = assertion.instance_path.first().cloned() else {
                tree.assertions.push(assertion);
                continue;
            };
            match tree.branches.iter_mut().find(|b| b.segment == segment) {
                Some(branch) => branch.assertions.push(assertion),
                None => tree.branches.push(Branch {
                    segment,
                    assertions: vec![assertion],
                }),
            }
        }
        tree
    }

    /// Failures located at the node itself.
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch(&self, segment: &PathSegment) -> Option<&Branch> {
        self.branches.iter().find(|b| &b.segment == segment)
    }

    /// Total number of assertions, node-level and in branches.
    pub fn len(&self) -> usize {
        self.assertions.len() + self.branches.iter().map(|b| b.assertions.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assertion> {
        self.assertions
            .iter()
            .chain(self.branches.iter().flat_map(|b| b.assertions.iter()))
    }

    pub fn into_assertions(self) -> Vec<Assertion> {
        let mut all = self.assertions;
        for branch in self.branches {
            all.extend(branch.assertions);
        }
        all
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema validation failed with {} error(s):", self.len())?;
        for assertion in self.iter() {
            writeln!(f, "  - {assertion}")?;
        }
        Ok(())
    }
}

/// Run `validator` over `instance`.
pub(crate) fn check(validator: &Validator, instance: &Value) -> Result<(), ErrorTree> {
    let assertions: Vec<Assertion> = validator
        .iter_errors(instance)
        .map(|error| Assertion::from_error(&error, instance))
        .collect();
    if assertions.is_empty() {
        Ok(())
    } else {
        Err(ErrorTree::from_assertions(assertions))
    }
}
