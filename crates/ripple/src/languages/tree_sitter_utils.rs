//! Shared tree-sitter utilities for language support modules.
//!
//! Provides common functions for extracting text and positions from tree-sitter nodes.

// Tree-sitter returns usize for positions, but source positions fit in u32.
#![allow(clippy::cast_possible_truncation)]

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range contains invalid UTF-8.
pub fn node_text(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    match std::str::from_utf8(&content[node.byte_range()]) {
        Ok(s) => Some(s.to_string()),
        Err(e) => {
            tracing::trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            None
        }
    }
}

/// Value of a `string` literal node with its quotes removed.
///
/// Template strings and other literal kinds return `None`.
pub fn string_literal_value(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let text = node_text(node, content)?;
    let unquoted = text
        .strip_prefix(['"', '\''])
        .and_then(|s| s.strip_suffix(['"', '\'']))?;
    Some(unquoted.to_string())
}

/// 1-indexed `(line, column)` of the start of a node.
pub fn node_position(node: &tree_sitter::Node) -> (u32, u32) {
    let start = node.start_position();
    (start.row as u32 + 1, start.column as u32 + 1)
}

/// First error or missing node in pre-order, if any.
pub fn first_error_node<'tree>(node: &tree_sitter::Node<'tree>) -> Option<tree_sitter::Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.iter().find_map(first_error_node)
}
