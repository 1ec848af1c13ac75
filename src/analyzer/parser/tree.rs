//! Grammar tree cleaning
//!
//! Converts a grammar tree into plain JSON: parent links are never followed,
//! fields whose name starts with `_` are dropped, extra nodes (comments) are
//! skipped, and any node reached twice is replaced by `"[Circular]"`.
//! Identity is tracked per node handle, not by value, so two structurally
//! equal subtrees are both emitted in full.

use std::collections::HashSet;
use std::hash::Hash;

use serde_json::{Map, Value, json};

use crate::constants::analysis::CIRCULAR_MARKER;
use crate::types::Span;

/// Minimal view of a grammar node needed for cleaning
pub trait TreeNode: Sized {
    type Id: Eq + Hash + Copy;

    /// Stable identity of this node within its tree
    fn id(&self) -> Self::Id;

    fn kind(&self) -> &str;

    fn span(&self) -> Span;

    /// Extra nodes (comments) may appear anywhere and are skipped
    fn is_extra(&self) -> bool {
        false
    }

    /// Source text for leaf nodes
    fn leaf_text(&self) -> Option<String>;

    /// Named children, each with the grammar field it occupies
    fn children(&self) -> Vec<(Option<String>, Self)>;
}

/// Clean one subtree, sharing `visited` across calls for the same tree
pub fn clean_tree<N: TreeNode>(node: &N, visited: &mut HashSet<N::Id>) -> Value {
    if !visited.insert(node.id()) {
        return Value::String(CIRCULAR_MARKER.to_string());
    }

    let span = node.span();
    let mut object = Map::new();
    object.insert("type".to_string(), Value::String(node.kind().to_string()));
    object.insert(
        "loc".to_string(),
        json!({
            "start": { "line": span.start_line, "column": span.start_column },
            "end": { "line": span.end_line, "column": span.end_column },
        }),
    );
    object.insert("start".to_string(), json!(span.start_byte));
    object.insert("end".to_string(), json!(span.end_byte));

    let children = node.children();
    if children.is_empty() {
        if let Some(text) = node.leaf_text() {
            object.insert("text".to_string(), Value::String(text));
        }
        return Value::Object(object);
    }

    let mut unnamed = Vec::new();
    for (field, child) in children {
        if child.is_extra() {
            continue;
        }
        match field {
            Some(field) if field.starts_with('_') || field == "parent" => continue,
            Some(field) => {
                let value = clean_tree(&child, visited);
                match object.get_mut(&field) {
                    Some(Value::Array(items)) => items.push(value),
                    Some(existing) => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, value]);
                    }
                    None => {
                        object.insert(field, value);
                    }
                }
            }
            None => unnamed.push(clean_tree(&child, visited)),
        }
    }
    if !unnamed.is_empty() {
        object.insert("children".to_string(), Value::Array(unnamed));
    }

    Value::Object(object)
}
