//! # Runtime Value Kinds
//!
//! The six JSON kinds, used as the dispatch key of the node builder and
//! as the key of the type registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The runtime kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 6] = [
        Kind::Null,
        Kind::Boolean,
        Kind::Number,
        Kind::String,
        Kind::Array,
        Kind::Object,
    ];

    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// The registry name of this kind (`"object"`, `"array"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    /// Whether values of this kind have children (objects and arrays).
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Object)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = String;

    /// Parses a registry kind name. `"integer"` is accepted as an alias of
    /// `number`, matching JSON Schema's `type` vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(Kind::Null),
            "boolean" => Ok(Kind::Boolean),
            "number" | "integer" => Ok(Kind::Number),
            "string" => Ok(Kind::String),
            "array" => Ok(Kind::Array),
            "object" => Ok(Kind::Object),
            other => Err(format!("unknown kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_every_json_kind() {
        assert_eq!(Kind::of(&json!(null)), Kind::Null);
        assert_eq!(Kind::of(&json!(false)), Kind::Boolean);
        assert_eq!(Kind::of(&json!(1.5)), Kind::Number);
        assert_eq!(Kind::of(&json!("x")), Kind::String);
        assert_eq!(Kind::of(&json!([1])), Kind::Array);
        assert_eq!(Kind::of(&json!({"a": 1})), Kind::Object);
    }

    #[test]
    fn name_round_trips_through_from_str() {
        for kind in Kind::ALL {
            assert_eq!(kind.name().parse::<Kind>().unwrap(), kind);
        }
    }

    #[test]
    fn integer_is_a_number() {
        assert_eq!("integer".parse::<Kind>().unwrap(), Kind::Number);
        assert!("float".parse::<Kind>().is_err());
    }

    #[test]
    fn only_objects_and_arrays_are_containers() {
        let containers: Vec<Kind> = Kind::ALL.into_iter().filter(|k| k.is_container()).collect();
        assert_eq!(containers, vec![Kind::Array, Kind::Object]);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_value(Kind::Object).unwrap(), json!("object"));
        let kind: Kind = serde_json::from_value(json!("array")).unwrap();
        assert_eq!(kind, Kind::Array);
    }
}
