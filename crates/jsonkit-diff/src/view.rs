//! Annotated tree view of a JSON document.
//!
//! Flattens a document into one line per node, the way a tree editor
//! lists them, and looks each node's path up in a [`PathAnnotationMap`].
//! Only the node whose exact path is classified gets a kind; its children
//! are looked up independently.

use serde::Serialize;
use serde_json::Value;

use crate::map::{ChangeKind, PathAnnotationMap};
use crate::path::JsonPath;

/// One rendered node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewLine {
    /// Nesting depth; the document root is 0.
    pub depth: usize,
    /// Dotted path of the node.
    pub path: String,
    /// `key: value` for scalars, `key: {n}` / `key: [n]` for containers.
    pub label: String,
    /// Classification from the map, if any.
    pub kind: Option<ChangeKind>,
}

/// Flatten `doc` into view lines styled by `map`.
pub fn annotated_lines(doc: &Value, map: &PathAnnotationMap) -> Vec<ViewLine> {
    let mut lines = Vec::new();
    let mut path = JsonPath::root();
    push_node(None, doc, 0, &mut path, map, &mut lines);
    lines
}

fn push_node(
    name: Option<&str>,
    value: &Value,
    depth: usize,
    path: &mut JsonPath,
    map: &PathAnnotationMap,
    lines: &mut Vec<ViewLine>,
) {
    let summary = summarize(value);
    let label = match name {
        Some(name) => format!("{name}: {summary}"),
        None => summary,
    };
    let dotted = path.to_dotted();
    lines.push(ViewLine {
        depth,
        kind: map.get(&dotted),
        path: dotted,
        label,
    });

    match value {
        Value::Object(fields) => {
            for (key, child) in fields {
                path.push_key(key.as_str());
                push_node(Some(key), child, depth + 1, path, map, lines);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push_index(index);
                push_node(Some(&index.to_string()), child, depth + 1, path, map, lines);
                path.pop();
            }
        }
        _ => {}
    }
}

fn summarize(value: &Value) -> String {
    match value {
        Value::Object(fields) => format!("{{{}}}", fields.len()),
        Value::Array(items) => format!("[{}]", items.len()),
        scalar => scalar.to_string(),
    }
}
