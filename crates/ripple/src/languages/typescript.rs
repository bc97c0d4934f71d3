//! TypeScript and JavaScript import/export extraction.
//!
//! The TypeScript, TSX and JavaScript grammars share node kinds for every
//! construct handled here, so one extractor serves all three.

use super::tree_sitter_utils::{node_text, string_literal_value};
use crate::types::SourceFacts;

/// Synthetic export name recorded for `export default ...`.
pub const DEFAULT_EXPORT: &str = "default";

/// Tree-sitter node kind constants shared by the JS/TS grammars.
mod node_kinds {
    // Statements
    pub const PROGRAM: &str = "program";
    pub const IMPORT_STATEMENT: &str = "import_statement";
    pub const IMPORT_REQUIRE_CLAUSE: &str = "import_require_clause";
    pub const EXPORT_STATEMENT: &str = "export_statement";

    // Export structure
    pub const EXPORT_CLAUSE: &str = "export_clause";
    pub const EXPORT_SPECIFIER: &str = "export_specifier";
    pub const NAMESPACE_EXPORT: &str = "namespace_export";
    pub const DEFAULT: &str = "default";

    // Declarations
    pub const LEXICAL_DECLARATION: &str = "lexical_declaration";
    pub const VARIABLE_DECLARATION: &str = "variable_declaration";
    pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
    pub const AMBIENT_DECLARATION: &str = "ambient_declaration";

    // Patterns
    pub const IDENTIFIER: &str = "identifier";
    pub const SHORTHAND_PROPERTY_IDENTIFIER_PATTERN: &str = "shorthand_property_identifier_pattern";
    pub const PAIR_PATTERN: &str = "pair_pattern";
    pub const ASSIGNMENT_PATTERN: &str = "assignment_pattern";
    pub const OBJECT_ASSIGNMENT_PATTERN: &str = "object_assignment_pattern";

    // Expressions
    pub const CALL_EXPRESSION: &str = "call_expression";
    pub const IMPORT: &str = "import";
}

/// Extract the import specifiers and export names from a syntax tree.
pub fn extract_source_facts(tree: &tree_sitter::Tree, content: &[u8]) -> SourceFacts {
    let mut facts = SourceFacts::default();
    walk(&tree.root_node(), content, &mut facts);
    facts
}

fn walk(node: &tree_sitter::Node, content: &[u8], facts: &mut SourceFacts) {
    use node_kinds::{CALL_EXPRESSION, EXPORT_STATEMENT, IMPORT_STATEMENT, PROGRAM};

    match node.kind() {
        IMPORT_STATEMENT => {
            if let Some(specifier) = import_source(node, content) {
                facts.imports.push(specifier);
            }
        }
        EXPORT_STATEMENT => {
            if let Some(source) = node.child_by_field_name("source") {
                if let Some(specifier) = string_literal_value(&source, content) {
                    facts.imports.push(specifier);
                }
            }
            // Exports nested in `declare module` or namespaces are not module exports
            let top_level = node.parent().is_some_and(|p| p.kind() == PROGRAM);
            if top_level {
                collect_exports(node, content, facts);
            }
        }
        CALL_EXPRESSION => {
            if let Some(specifier) = call_specifier(node, content) {
                facts.imports.push(specifier);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(&child, content, facts);
    }
}

/// Specifier of `import ... from "x"`, `import "x"` or `import x = require("x")`.
fn import_source(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    if let Some(source) = node.child_by_field_name("source") {
        return string_literal_value(&source, content);
    }

    let mut cursor = node.walk();
    let require_clause = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == node_kinds::IMPORT_REQUIRE_CLAUSE)?;
    let source = require_clause.child_by_field_name("source")?;
    string_literal_value(&source, content)
}

/// Specifier of `require("x")` or `import("x")` with a single string argument.
fn call_specifier(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    let function = node.child_by_field_name("function")?;
    let is_loader = match function.kind() {
        node_kinds::IMPORT => true,
        node_kinds::IDENTIFIER => node_text(&function, content).as_deref() == Some("require"),
        _ => false,
    };
    if !is_loader {
        return None;
    }

    let arguments = node.child_by_field_name("arguments")?;
    if arguments.named_child_count() != 1 {
        return None;
    }
    let argument = arguments.named_child(0)?;
    string_literal_value(&argument, content)
}

fn collect_exports(node: &tree_sitter::Node, content: &[u8], facts: &mut SourceFacts) {
    use node_kinds::{DEFAULT, EXPORT_CLAUSE, NAMESPACE_EXPORT};

    if let Some(declaration) = node.child_by_field_name("declaration") {
        let is_default = {
            let mut cursor = node.walk();
            node.children(&mut cursor).any(|c| c.kind() == DEFAULT)
        };
        if !is_default {
            declaration_names(&declaration, content, facts);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            DEFAULT => facts.push_export(DEFAULT_EXPORT.to_string()),
            EXPORT_CLAUSE => clause_names(&child, content, facts),
            NAMESPACE_EXPORT => {
                // `export * as ns from "x"`
                let mut inner = child.walk();
                let name = child
                    .named_children(&mut inner)
                    .find_map(|n| exported_name(&n, content));
                if let Some(name) = name {
                    facts.push_export(name);
                }
            }
            _ => {}
        }
    }
}

/// Names bound by an exported declaration.
fn declaration_names(node: &tree_sitter::Node, content: &[u8], facts: &mut SourceFacts) {
    use node_kinds::{
        AMBIENT_DECLARATION, LEXICAL_DECLARATION, VARIABLE_DECLARATION, VARIABLE_DECLARATOR,
    };

    match node.kind() {
        LEXICAL_DECLARATION | VARIABLE_DECLARATION => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != VARIABLE_DECLARATOR {
                    continue;
                }
                if let Some(pattern) = declarator.child_by_field_name("name") {
                    pattern_names(&pattern, content, facts);
                }
            }
        }
        AMBIENT_DECLARATION => {
            // `export declare const x: number;`
            let mut cursor = node.walk();
            for inner in node.named_children(&mut cursor) {
                declaration_names(&inner, content, facts);
            }
        }
        _ => {
            if let Some(name) = node.child_by_field_name("name") {
                if let Some(text) = node_text(&name, content) {
                    facts.push_export(text);
                }
            }
        }
    }
}

/// Identifiers bound by a (possibly destructuring) pattern.
fn pattern_names(node: &tree_sitter::Node, content: &[u8], facts: &mut SourceFacts) {
    use node_kinds::{
        ASSIGNMENT_PATTERN, IDENTIFIER, OBJECT_ASSIGNMENT_PATTERN, PAIR_PATTERN,
        SHORTHAND_PROPERTY_IDENTIFIER_PATTERN,
    };

    match node.kind() {
        IDENTIFIER | SHORTHAND_PROPERTY_IDENTIFIER_PATTERN => {
            if let Some(text) = node_text(node, content) {
                facts.push_export(text);
            }
        }
        PAIR_PATTERN => {
            // `{ key: local }` binds `local`
            if let Some(value) = node.child_by_field_name("value") {
                pattern_names(&value, content, facts);
            }
        }
        ASSIGNMENT_PATTERN | OBJECT_ASSIGNMENT_PATTERN => {
            if let Some(left) = node.child_by_field_name("left") {
                pattern_names(&left, content, facts);
            }
        }
        // object_pattern, array_pattern, rest_pattern
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                pattern_names(&child, content, facts);
            }
        }
    }
}

/// Names from `export { a, b as c }`: the alias wins when present.
fn clause_names(node: &tree_sitter::Node, content: &[u8], facts: &mut SourceFacts) {
    let mut cursor = node.walk();
    for specifier in node.named_children(&mut cursor) {
        if specifier.kind() != node_kinds::EXPORT_SPECIFIER {
            continue;
        }
        let exported = specifier
            .child_by_field_name("alias")
            .or_else(|| specifier.child_by_field_name("name"));
        if let Some(name) = exported.and_then(|n| exported_name(&n, content)) {
            facts.push_export(name);
        }
    }
}

/// An identifier or string module export name (`export { x as "y" }`).
fn exported_name(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    if node.kind() == "string" {
        return string_literal_value(node, content);
    }
    node_text(node, content)
}
