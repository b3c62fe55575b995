//! # Hypermedia Links
//!
//! JSON Hyper-Schema link descriptors: `{ rel, href, method, targetSchema }`.
//! An `href` may be a URI template whose `{name}` variables are filled from
//! the instance the link is followed for.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IoError;

/// Characters escaped in an expanded template value: everything that is
/// not allowed in, or would end, a URL path segment or query value.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn default_method() -> String {
    "GET".to_string()
}

/// One link descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(default = "default_method")]
    pub method: String,
    /// Schema of the resource the link leads to.
    #[serde(
        default,
        rename = "targetSchema",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_schema: Option<Value>,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            method: default_method(),
            target_schema: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_target_schema(mut self, schema: Value) -> Self {
        self.target_schema = Some(schema);
        self
    }

    /// Expand `{name}` variables of the href from `instance`.
    ///
    /// Strings are inserted as is, other scalars in their JSON form, all
    /// percent-encoded. Missing properties and containers expand to the
    /// empty string. An unterminated `{` is kept literally.
    pub fn href_for(&self, instance: &Value) -> String {
        let mut out = String::with_capacity(self.href.len());
        let mut rest = self.href.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            out.push_str(&rest[..open]);
            let name = &rest[open + 1..close];
            let raw = match instance.get(name) {
                Some(Value::String(s)) => s.clone(),
                Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
                _ => String::new(),
            };
            out.extend(utf8_percent_encode(&raw, SEGMENT));
            rest = &rest[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

/// An ordered list of links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links(Vec<Link>);

impl Links {
    pub fn new(links: Vec<Link>) -> Self {
        Self(links)
    }

    /// Parse a raw links array, or an object carrying one under `links`.
    pub fn parse(value: &Value) -> Result<Self, IoError> {
        match value {
            Value::Array(_) => serde_json::from_value::<Vec<Link>>(value.clone())
                .map(Self)
                .map_err(|e| IoError::InvalidLinks(e.to_string())),
            Value::Object(map) => match map.get("links") {
                Some(inner) => Self::parse(inner),
                None => Err(IoError::InvalidLinks("object has no 'links' member".into())),
            },
            other => Err(IoError::InvalidLinks(format!(
                "expected an array or an object, got {other}"
            ))),
        }
    }

    /// The first link with relation `rel`.
    pub fn rel(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|l| l.rel == rel)
    }

    /// The link for the first of `rels` that has one.
    pub fn first_of<S: AsRef<str>>(&self, rels: &[S]) -> Option<&Link> {
        rels.iter().find_map(|r| self.rel(r.as_ref()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Link>> for Links {
    fn from(links: Vec<Link>) -> Self {
        Self(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_array_and_wrapped_forms() {
        let raw = json!([
            {"rel": "self", "href": "/contacts/{id}"},
            {"rel": "create", "href": "/contacts", "method": "POST"}
        ]);
        let links = Links::parse(&raw).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links.rel("self").unwrap().method, "GET");
        assert_eq!(links.rel("create").unwrap().method, "POST");

        let wrapped = Links::parse(&json!({"links": raw})).unwrap();
        assert_eq!(wrapped, links);
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert!(matches!(Links::parse(&json!("x")), Err(IoError::InvalidLinks(_))));
        assert!(matches!(Links::parse(&json!({})), Err(IoError::InvalidLinks(_))));
        assert!(matches!(
            Links::parse(&json!([{"href": "/no-rel"}])),
            Err(IoError::InvalidLinks(_))
        ));
    }

    #[test]
    fn target_schema_uses_hyper_schema_name() {
        let links = Links::parse(&json!([
            {"rel": "instances", "href": "/c", "targetSchema": {"type": "array"}}
        ]))
        .unwrap();
        assert_eq!(
            links.rel("instances").unwrap().target_schema,
            Some(json!({"type": "array"}))
        );
    }

    #[test]
    fn first_of_respects_priority_order() {
        let links = Links::new(vec![Link::new("update", "/u"), Link::new("edit", "/e")]);
        assert_eq!(links.first_of(&["edit", "update"]).unwrap().href, "/e");
        assert_eq!(links.first_of(&["missing", "update"]).unwrap().href, "/u");
        assert!(links.first_of(&["create"]).is_none());
    }

    #[test]
    fn href_template_expansion() {
        let link = Link::new("self", "/contacts/{id}/notes/{slug}?v={missing}");
        let instance = json!({"id": 42, "slug": "a b/c"});
        assert_eq!(link.href_for(&instance), "/contacts/42/notes/a%20b%2Fc?v=");
    }

    #[test]
    fn template_values_are_path_encoded() {
        let link = Link::new("self", "/people/{name}?tag={tag}");
        let instance = json!({"name": "Ada Lovelace", "tag": "a+b&c=d?#"});
        assert_eq!(
            link.href_for(&instance),
            "/people/Ada%20Lovelace?tag=a%2Bb%26c%3Dd%3F%23"
        );
        let unicode = Link::new("self", "/people/{name}");
        assert_eq!(
            unicode.href_for(&json!({"name": "Zoë"})),
            "/people/Zo%C3%AB"
        );
    }

    #[test]
    fn unterminated_template_is_literal() {
        let link = Link::new("self", "/x/{id");
        assert_eq!(link.href_for(&json!({"id": 1})), "/x/{id");
    }
}
