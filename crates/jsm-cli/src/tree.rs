//! # Build and Validate Subcommands
//!
//! ```bash
//! jsm build --schema contact.json --instance ada.json --pretty
//! jsm validate --schema contact.yaml --instance ada.yaml
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use jsm_core::{InstancePath, PathSegment};
use jsm_model::{Builder, Node};

/// Arguments shared by `build` and `validate`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Schema document (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Instance document (JSON or YAML). Without one the tree is built
    /// from the schema's defaults.
    #[arg(long)]
    pub instance: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

fn build_tree(args: &TreeArgs) -> Result<Node> {
    let schema = crate::load_schema(&args.schema)?;
    let instance = crate::load_instance(args.instance.as_deref())?;
    Ok(Builder::default().build_node(&schema, instance))
}

/// Print the built tree's value.
pub fn run_build(args: &TreeArgs, out: &mut impl Write) -> Result<u8> {
    let node = build_tree(args)?;
    let value = node.to_value();
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    writeln!(out, "{rendered}")?;
    Ok(0)
}

/// Validate the built tree. Exit code 1 when it is invalid.
pub fn run_validate(args: &TreeArgs, out: &mut impl Write) -> Result<u8> {
    let mut node = build_tree(args)?;
    if node.validate() {
        writeln!(out, "valid")?;
        return Ok(0);
    }

    let mut located = Vec::new();
    collect(&node, &InstancePath::root(), &mut located);
    for (path, message) in &located {
        writeln!(out, "{path}: {message}")?;
    }
    writeln!(out, "{} error(s)", located.len())?;
    Ok(1)
}

/// Every error in the tree, with its path from the root.
fn collect(node: &Node, at: &InstancePath, out: &mut Vec<(String, String)>) {
    for assertion in node.errors() {
        let mut segments = at.segments().to_vec();
        segments.extend(assertion.instance_path.segments().iter().cloned());
        let path = InstancePath::from(segments);
        let shown = if path.is_root() {
            "(root)".to_string()
        } else {
            path.to_pointer()
        };
        out.push((shown, assertion.message.clone()));
    }

    if let Some(model) = node.as_model() {
        for (key, child) in model.iter() {
            collect(child, &at.child(key), out);
        }
    } else if let Some(collection) = node.as_collection() {
        for (index, item) in collection.iter().enumerate() {
            collect(item, &at.child(PathSegment::Index(index)), out);
        }
    }
}
