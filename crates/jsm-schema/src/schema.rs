//! # Schema Handles
//!
//! A [`Schema`] points at one location inside a shared schema document.
//! Deriving a sub-schema never copies the document: it appends to the JSON
//! Pointer and follows local `$ref`s, so every handle derived from the same
//! document shares one validator cache.
//!
//! A handle may also be *open*: it accepts every instance and has no
//! sub-schemas. Nodes built for keys no schema covers are governed by an
//! open handle on their parent's document.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use parking_lot::Mutex;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use jsm_core::escape_token;

use crate::correlation::Correlation;
use crate::error::SchemaError;
use crate::load::load_document;

/// The `true` schema: accepts everything.
static ACCEPT_ALL: Value = Value::Bool(true);

/// Upper bound on chained local `$ref`s, so a reference cycle cannot hang
/// sub-schema resolution.
const MAX_REF_DEPTH: usize = 32;

/// Base URI the root document is registered under when a sub-schema is
/// compiled, unless the root declares its own `$id`.
const DOCUMENT_URI: &str = "urn:jsm:document";

/// Characters escaped when a JSON Pointer is placed in a URI fragment.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Resolves `$ref` URIs without touching the network.
///
/// The document's own URI (its `$id`, or [`DOCUMENT_URI`]) yields the
/// document; anything else is treated as the permissive schema `{}`.
struct OfflineRetriever {
    root_id: Option<String>,
    root: Value,
}

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str().trim_end_matches('#');
        let is_root = uri_str == DOCUMENT_URI
            || self
                .root_id
                .as_deref()
                .is_some_and(|id| id.trim_end_matches('#') == uri_str);
        if is_root {
            return Ok(self.root.clone());
        }
        tracing::debug!(uri = uri_str, "external $ref left unresolved, treating it as open");
        Ok(serde_json::json!({}))
    }
}

struct Document {
    root: Value,
    /// Whether handles on this document expose a validate capability.
    validation: bool,
    /// Compiled validators by JSON Pointer. `None` records a location that
    /// failed to compile so it is not retried on every validate.
    validators: Mutex<HashMap<String, Option<Arc<Validator>>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Pointer(String),
    Open,
}

/// A handle on one schema location.
#[derive(Clone)]
pub struct Schema {
    doc: Arc<Document>,
    target: Target,
}

impl Schema {
    /// Wrap a parsed schema document, with validation enabled.
    pub fn new(document: Value) -> Self {
        Self::with_validation(document, true)
    }

    /// Wrap a schema document whose correlations expose no validate
    /// capability: [`Correlation::validate`] always returns `None`.
    pub fn unvalidated(document: Value) -> Self {
        Self::with_validation(document, false)
    }

    fn with_validation(document: Value, validation: bool) -> Self {
        Self {
            doc: Arc::new(Document {
                root: document,
                validation,
                validators: Mutex::new(HashMap::new()),
            }),
            target: Target::Pointer(String::new()),
        }
    }

    /// Load a JSON or YAML schema document from disk.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DocumentLoad` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Ok(Self::new(load_document(path.as_ref())?))
    }

    /// The schema value at this location.
    pub fn value(&self) -> &Value {
        match &self.target {
            Target::Pointer(pointer) => self.doc.root.pointer(pointer).unwrap_or(&ACCEPT_ALL),
            Target::Open => &ACCEPT_ALL,
        }
    }

    /// JSON Pointer of this location inside its document, `None` if open.
    pub fn pointer(&self) -> Option<&str> {
        match &self.target {
            Target::Pointer(pointer) => Some(pointer),
            Target::Open => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.target == Target::Open
    }

    /// A keyword of this schema (`"default"`, `"links"`, ...).
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.value().get(keyword)
    }

    /// The hypermedia `links` declared by this schema.
    pub fn links(&self) -> Option<&Value> {
        self.get("links")
    }

    /// Whether correlations of this schema can validate.
    pub fn validates(&self) -> bool {
        self.doc.validation
    }

    /// An open handle on the same document.
    pub fn open(&self) -> Schema {
        Schema {
            doc: Arc::clone(&self.doc),
            target: Target::Open,
        }
    }

    /// Bind this schema to an instance.
    pub fn bind<'a>(&'a self, instance: &'a Value) -> Correlation<'a> {
        Correlation::new(self, instance)
    }

    /// Derive the handle at `self/<tokens...>`, following local `$ref`s.
    ///
    /// Returns `None` if nothing is there, or if what is there is not a
    /// schema (an object or a boolean).
    pub(crate) fn descend(&self, tokens: &[&str]) -> Option<Schema> {
        let Target::Pointer(base) = &self.target else {
            return None;
        };
        let mut pointer = base.clone();
        for token in tokens {
            pointer.push('/');
            pointer.push_str(&escape_token(token));
        }
        match self.doc.root.pointer(&pointer) {
            Some(Value::Object(_)) | Some(Value::Bool(_)) => Some(Schema {
                doc: Arc::clone(&self.doc),
                target: Target::Pointer(self.follow_refs(pointer)),
            }),
            _ => None,
        }
    }

    /// Handles for each schema in an array-valued keyword (`allOf`, ...).
    pub(crate) fn branches(&self, keyword: &str) -> Vec<Schema> {
        let count = self.get(keyword).and_then(Value::as_array).map_or(0, Vec::len);
        (0..count)
            .filter_map(|i| self.descend(&[keyword, &i.to_string()]))
            .collect()
    }

    fn follow_refs(&self, mut pointer: String) -> String {
        let root = &self.doc.root;
        for _ in 0..MAX_REF_DEPTH {
            let Some(reference) = root
                .pointer(&pointer)
                .and_then(|v| v.get("$ref"))
                .and_then(Value::as_str)
            else {
                break;
            };
            let Some(target) = reference.strip_prefix('#') else {
                break;
            };
            if target == pointer || root.pointer(target).is_none() {
                break;
            }
            pointer = target.to_string();
        }
        pointer
    }

    /// Compile this location's validator now instead of on first validate.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidatorBuild` if the schema is not a valid
    /// JSON Schema.
    pub fn compile(&self) -> Result<(), SchemaError> {
        match &self.target {
            Target::Open => Ok(()),
            Target::Pointer(pointer) => self.build_validator(pointer).map(|_| ()),
        }
    }

    /// The cached validator for this location, compiling it on first use.
    ///
    /// `None` for open handles and for locations that fail to compile.
    pub(crate) fn validator(&self) -> Option<Arc<Validator>> {
        let Target::Pointer(pointer) = &self.target else {
            return None;
        };
        let mut cache = self.doc.validators.lock();
        if let Some(cached) = cache.get(pointer) {
            return cached.clone();
        }
        let compiled = match self.build_validator(pointer) {
            Ok(validator) => Some(Arc::new(validator)),
            Err(e) => {
                tracing::warn!(error = %e, "schema does not compile, validating it as open");
                None
            }
        };
        cache.insert(pointer.clone(), compiled.clone());
        compiled
    }

    fn build_validator(&self, pointer: &str) -> Result<Validator, SchemaError> {
        let document = self.validation_document(pointer);
        let retriever = OfflineRetriever {
            root_id: self.doc.root.get("$id").and_then(Value::as_str).map(String::from),
            root: self.doc.root.clone(),
        };

        // Documents without `$schema` are read as draft 7.
        let built = if document.get("$schema").is_some() {
            jsonschema::options()
                .should_validate_formats(true)
                .with_retriever(retriever)
                .build(&document)
        } else {
            jsonschema::options()
                .with_draft(Draft::Draft7)
                .should_validate_formats(true)
                .with_retriever(retriever)
                .build(&document)
        };

        built.map_err(|e| SchemaError::ValidatorBuild {
            pointer: pointer.to_string(),
            reason: e.to_string(),
        })
    }

    /// The document compiled for a location.
    ///
    /// The root is compiled as is. Any other location is compiled as a
    /// reference into the whole root document, so `$ref`s inside it
    /// (`#`, `#/definitions/...`, the root `$id`) resolve exactly as they
    /// do when the root itself is validated.
    fn validation_document(&self, pointer: &str) -> Value {
        let root = &self.doc.root;
        if pointer.is_empty() {
            return root.clone();
        }
        let fragment = utf8_percent_encode(pointer, FRAGMENT);
        let mut wrapper = serde_json::Map::new();
        if let Some(dialect) = root.get("$schema") {
            wrapper.insert("$schema".to_string(), dialect.clone());
        }
        wrapper.insert(
            "$ref".to_string(),
            Value::String(format!("{DOCUMENT_URI}#{fragment}")),
        );
        Value::Object(wrapper)
    }
}

impl PartialEq for Schema {
    /// Two handles are equal when they point at the same location of the
    /// same document.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.doc, &other.doc) && self.target == other.target
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("pointer", &self.pointer())
            .field("validates", &self.doc.validation)
            .field("value", self.value())
            .finish()
    }
}
