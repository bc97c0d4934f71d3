//! Language-specific import and export extraction.
//!
//! Each supported `Language` maps to a tree-sitter grammar. Extraction itself
//! lives in `typescript`, which handles every grammar ripple loads.
//!
//! ## Adding a New Language
//!
//! 1. Add the variant to `Language` in `types.rs`
//! 2. Return its grammar from `tree_sitter_language()`
//! 3. Extend or add an extractor producing `SourceFacts`

pub(crate) mod tree_sitter_utils;
pub mod typescript;

use crate::types::Language;

/// Tree-sitter grammar used to parse a language.
#[must_use]
pub fn tree_sitter_language(lang: Language) -> tree_sitter::Language {
    match lang {
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
    }
}
