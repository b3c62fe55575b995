//! # Document Loading
//!
//! Reads schema and instance documents from disk. The format is chosen by
//! file extension: `.yaml` / `.yml` are parsed as YAML and converted to the
//! equivalent JSON value tree, everything else is parsed as JSON.

use std::path::Path;

use serde_json::Value;

use crate::error::SchemaError;

/// Load a JSON or YAML document.
///
/// # Errors
///
/// Returns `SchemaError::DocumentLoad` if the file cannot be read, cannot
/// be parsed, or contains YAML that has no JSON equivalent.
pub fn load_document(path: &Path) -> Result<Value, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "yaml" | "yml" => {
            serde_yaml::from_str::<Value>(&content).map_err(|e| SchemaError::DocumentLoad {
                path: path.display().to_string(),
                reason: format!("invalid YAML: {e}"),
            })
        }
        _ => serde_json::from_str(&content).map_err(|e| SchemaError::DocumentLoad {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_yaml_schema_as_json() {
        let file = write_temp(
            ".yaml",
            r#"
type: object
required: [name]
properties:
  name: { type: string, minLength: 2 }
  age: { type: integer }
"#,
        );
        let value = load_document(file.path()).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["required"][0], "name");
        assert_eq!(value["properties"]["name"]["minLength"], 2);
    }

    #[test]
    fn loads_json_by_default() {
        let file = write_temp(".json", r#"{"one": "1", "two": 2}"#);
        let value = load_document(file.path()).unwrap();
        assert_eq!(value["two"], 2);
    }

    #[test]
    fn reports_invalid_json_with_path() {
        let file = write_temp(".json", "{not json");
        let err = load_document(file.path()).unwrap_err();
        match err {
            SchemaError::DocumentLoad { path, reason } => {
                assert!(path.ends_with(".json"));
                assert!(reason.contains("invalid JSON"));
            }
            other => panic!("Expected DocumentLoad, got: {other}"),
        }
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_document(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, SchemaError::DocumentLoad { .. }));
    }

    #[test]
    fn yaml_anchors_expand_in_place() {
        let file = write_temp(
            ".yml",
            r#"
definitions:
  name: &name { type: string, minLength: 2 }
properties:
  first: *name
  last: *name
"#,
        );
        let value = load_document(file.path()).unwrap();
        assert_eq!(value["properties"]["first"], value["definitions"]["name"]);
        assert_eq!(value["properties"]["last"]["minLength"], 2);
    }

    #[test]
    fn invalid_yaml_is_a_load_error() {
        let file = write_temp(".yaml", "key: [unclosed");
        let err = load_document(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));
    }
}
