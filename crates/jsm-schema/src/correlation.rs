//! # Correlations
//!
//! A [`Correlation`] is a schema bound to one instance value. It answers the
//! three questions the node builder asks while recursing:
//!
//! - what the instance looks like once schema defaults are applied
//!   ([`Correlation::coerce`]),
//! - which schema governs a given child ([`Correlation::subschema`]),
//! - whether the instance satisfies the schema, and if not, where
//!   ([`Correlation::validate`]).

use regex::Regex;
use serde_json::Value;

use jsm_core::{Kind, PathSegment};

use crate::schema::Schema;
use crate::validate::{self, ErrorTree};

/// A schema bound to an instance.
#[derive(Debug, Clone, Copy)]
pub struct Correlation<'a> {
    schema: &'a Schema,
    instance: &'a Value,
}

impl<'a> Correlation<'a> {
    pub(crate) fn new(schema: &'a Schema, instance: &'a Value) -> Self {
        Self { schema, instance }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn instance(&self) -> &'a Value {
        self.instance
    }

    /// The schema's `default`, if it declares one.
    pub fn default(&self) -> Option<&'a Value> {
        self.schema.get("default")
    }

    /// The instance with schema defaults applied.
    ///
    /// A `null` instance takes the default outright. An object instance is
    /// laid over an object default, instance keys winning. Returns `None`
    /// when the result does not match the schema's declared `type`.
    pub fn coerce(&self) -> Option<Value> {
        let coerced = match (self.instance, self.default()) {
            (Value::Null, Some(default)) => default.clone(),
            (Value::Object(instance), Some(Value::Object(default))) => {
                let mut merged = default.clone();
                for (key, value) in instance {
                    merged.insert(key.clone(), value.clone());
                }
                Value::Object(merged)
            }
            (instance, _) => instance.clone(),
        };

        match self.schema.get("type") {
            Some(types) if !admits(types, &coerced) => None,
            _ => Some(coerced),
        }
    }

    /// The schema governing the child at `segment`, if any.
    ///
    /// Looks at the structural keywords first (`properties`,
    /// `patternProperties`, `additionalProperties` for objects; `items`,
    /// `prefixItems`, `additionalItems` for arrays), then into `allOf`
    /// branches, then into the `anyOf` / `oneOf` branches this instance
    /// satisfies.
    pub fn subschema(&self, segment: &PathSegment) -> Option<Schema> {
        if let Some(found) = self.direct_subschema(segment) {
            return Some(found);
        }

        for branch in self.schema.branches("allOf") {
            if let Some(found) = branch.bind(self.instance).subschema(segment) {
                return Some(found);
            }
        }

        for keyword in ["anyOf", "oneOf"] {
            for branch in self.schema.branches(keyword) {
                let correlation = branch.bind(self.instance);
                if correlation.is_valid() == Some(false) {
                    continue;
                }
                if let Some(found) = correlation.subschema(segment) {
                    return Some(found);
                }
            }
        }

        None
    }

    fn direct_subschema(&self, segment: &PathSegment) -> Option<Schema> {
        match segment {
            PathSegment::Property(name) => self.property_subschema(name),
            PathSegment::Index(index) => self.item_subschema(*index),
        }
    }

    fn property_subschema(&self, name: &str) -> Option<Schema> {
        if let Some(found) = self.schema.descend(&["properties", name]) {
            return Some(found);
        }

        if let Some(Value::Object(patterns)) = self.schema.get("patternProperties") {
            for pattern in patterns.keys() {
                match Regex::new(pattern) {
                    Ok(re) if re.is_match(name) => {
                        return self.schema.descend(&["patternProperties", pattern]);
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(pattern = %pattern, error = %e, "skipping invalid patternProperties regex"),
                }
            }
        }

        match self.schema.get("additionalProperties") {
            Some(Value::Object(_)) => self.schema.descend(&["additionalProperties"]),
            _ => None,
        }
    }

    fn item_subschema(&self, index: usize) -> Option<Schema> {
        let position = index.to_string();
        match self.schema.get("items") {
            // Tuple form: one schema per position, the rest from `additionalItems`.
            Some(Value::Array(tuple)) => {
                if index < tuple.len() {
                    self.schema.descend(&["items", &position])
                } else {
                    self.schema.descend(&["additionalItems"])
                }
            }
            items => {
                let prefix_len = self
                    .schema
                    .get("prefixItems")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                if index < prefix_len {
                    self.schema.descend(&["prefixItems", &position])
                } else if matches!(items, Some(Value::Object(_)) | Some(Value::Bool(_))) {
                    self.schema.descend(&["items"])
                } else {
                    None
                }
            }
        }
    }

    /// Whether the instance satisfies the schema.
    ///
    /// `None` when the schema carries no validate capability. A schema that
    /// failed to compile is treated as satisfied.
    pub fn is_valid(&self) -> Option<bool> {
        if !self.schema.validates() {
            return None;
        }
        Some(
            self.schema
                .validator()
                .map_or(true, |validator| validator.is_valid(self.instance)),
        )
    }

    /// Validate the instance, grouping failures by the child they belong to.
    ///
    /// `None` when the schema carries no validate capability.
    pub fn validate(&self) -> Option<Result<(), ErrorTree>> {
        if !self.schema.validates() {
            return None;
        }
        Some(match self.schema.validator() {
            Some(validator) => validate::check(&validator, self.instance),
            None => Ok(()),
        })
    }
}

/// Whether a `type` keyword admits `value`. Unknown type names admit
/// everything.
fn admits(types: &Value, value: &Value) -> bool {
    match types {
        Value::String(name) => admits_type(name, value),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| admits_type(name, value)),
        _ => true,
    }
}

fn admits_type(name: &str, value: &Value) -> bool {
    match name {
        "integer" => {
            value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        "any" => true,
        other => other
            .parse::<Kind>()
            .map_or(true, |kind| kind == Kind::of(value)),
    }
}
