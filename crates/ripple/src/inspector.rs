//! Source inspection: turning one file into its raw imports and exports.
//!
//! The graph builder only depends on the `SourceInspector` trait. The default
//! implementation, `TreeSitterInspector`, parses JavaScript and TypeScript with
//! tree-sitter and reuses a single parser across files.
//!
//! ## Failure Model
//!
//! Every failure is file-local and reported as an `InspectError`:
//!
//! | Condition | Kind |
//! |-----------|------|
//! | File cannot be read | `ReadFailed` |
//! | Content is not UTF-8 | `EncodingError` |
//! | Extension has no grammar | `UnsupportedLanguage` |
//! | Tree contains error or missing nodes | `ParseFailed` |

use std::path::Path;

use tracing::trace;

use crate::error::{Error, InspectError, Result};
use crate::languages::tree_sitter_utils::{first_error_node, node_position};
use crate::languages::{tree_sitter_language, typescript};
use crate::types::{Language, SourceFacts};

/// Extracts raw import specifiers and export names from a source file.
pub trait SourceInspector {
    /// Inspect the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an `InspectError` when the file cannot be read or parsed.
    fn inspect(&mut self, path: &Path) -> std::result::Result<SourceFacts, InspectError>;
}

/// Tree-sitter backed inspector for `.ts`, `.tsx`, `.js` and friends.
pub struct TreeSitterInspector {
    parser: tree_sitter::Parser,
    loaded: Option<Language>,
}

impl TreeSitterInspector {
    /// Create an inspector, checking that every grammar loads.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parser` if a grammar is incompatible with the linked
    /// tree-sitter runtime.
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        for lang in [Language::JavaScript, Language::Tsx, Language::TypeScript] {
            parser
                .set_language(&tree_sitter_language(lang))
                .map_err(|e| Error::Parser(format!("{lang:?} grammar: {e}")))?;
        }
        Ok(Self {
            parser,
            loaded: Some(Language::TypeScript),
        })
    }

    /// Parse `content` as `language` and extract its facts.
    fn inspect_source(
        &mut self,
        path: &Path,
        language: Language,
        content: &str,
    ) -> std::result::Result<SourceFacts, InspectError> {
        if self.loaded != Some(language) {
            self.parser
                .set_language(&tree_sitter_language(language))
                .map_err(|e| InspectError::parse_failed(path.to_path_buf(), e.to_string()))?;
            self.loaded = Some(language);
        }

        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| InspectError::parse_failed(path.to_path_buf(), "parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error_node(&root) {
                Some(bad) if bad.is_missing() => {
                    let (line, column) = node_position(&bad);
                    format!("missing `{}` at {line}:{column}", bad.kind())
                }
                Some(bad) => {
                    let (line, column) = node_position(&bad);
                    format!("syntax error at {line}:{column}")
                }
                None => "syntax error".to_string(),
            };
            return Err(InspectError::parse_failed(path.to_path_buf(), message));
        }

        Ok(typescript::extract_source_facts(&tree, content.as_bytes()))
    }
}

impl SourceInspector for TreeSitterInspector {
    fn inspect(&mut self, path: &Path) -> std::result::Result<SourceFacts, InspectError> {
        let Some(language) = Language::from_path(path) else {
            return Err(InspectError::unsupported_language(path.to_path_buf()));
        };

        let bytes =
            std::fs::read(path).map_err(|e| InspectError::read_failed(path.to_path_buf(), &e))?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| InspectError::encoding_error(path.to_path_buf()))?;

        let facts = self.inspect_source(path, language, content)?;
        trace!(
            file = %path.display(),
            imports = facts.imports.len(),
            exports = facts.exports.len(),
            "Inspected file"
        );
        Ok(facts)
    }
}
