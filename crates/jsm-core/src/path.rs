//! # Instance Paths
//!
//! A structured replacement for JSON Pointer strings. Validation errors are
//! located by an [`InstancePath`], a sequence of [`PathSegment`]s that are
//! either object property names or array indices.
//!
//! A bare JSON Pointer cannot tell `"/items/0"` (index 0) from a property
//! literally named `"0"`. [`InstancePath::from_pointer`] resolves that by
//! walking the instance the pointer was produced against.

use std::fmt;

use serde_json::Value;

use crate::error::PathError;

/// One step into a JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// An object property name.
    Property(String),
    /// An array index.
    Index(usize),
}

impl PathSegment {
    pub fn as_property(&self) -> Option<&str> {
        match self {
            PathSegment::Property(name) => Some(name),
            PathSegment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Property(_) => None,
            PathSegment::Index(i) => Some(*i),
        }
    }

    /// The unescaped pointer token for this segment.
    pub fn token(&self) -> String {
        match self {
            PathSegment::Property(name) => name.clone(),
            PathSegment::Index(i) => i.to_string(),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Property(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Property(name)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Property(name) => f.write_str(name),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Escape a token for inclusion in a JSON Pointer (`~` → `~0`, `/` → `~1`).
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape_token(token: &str) -> Result<String, PathError> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return Err(PathError::BadEscape(token.to_string())),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// A location inside a JSON instance, relative to some node.
///
/// The empty path addresses the node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn split_first(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.segments.split_first()
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// A new path one segment deeper.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Parse a JSON Pointer produced against `instance`.
    ///
    /// Numeric tokens become [`PathSegment::Index`] only where the value at
    /// that point of the walk is an array. Tokens that walk past the end of
    /// the instance (e.g. the name of a missing required property) are kept
    /// as properties.
    pub fn from_pointer(pointer: &str, instance: &Value) -> Result<Self, PathError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(PathError::NotAPointer(pointer.to_string()));
        };

        let mut segments = Vec::new();
        let mut cursor = Some(instance);
        for raw in rest.split('/') {
            let token = unescape_token(raw)?;
            let segment = match cursor {
                Some(Value::Array(items)) => match token.parse::<usize>() {
                    Ok(i) => {
                        cursor = items.get(i);
                        PathSegment::Index(i)
                    }
                    Err(_) => {
                        cursor = None;
                        PathSegment::Property(token)
                    }
                },
                Some(Value::Object(map)) => {
                    cursor = map.get(&token);
                    PathSegment::Property(token)
                }
                _ => {
                    cursor = None;
                    PathSegment::Property(token)
                }
            };
            segments.push(segment);
        }
        Ok(Self { segments })
    }

    /// Render as a JSON Pointer (`""` for the root).
    pub fn to_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("/{}", escape_token(&s.token())))
            .collect()
    }
}

impl From<Vec<PathSegment>> for InstancePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}
