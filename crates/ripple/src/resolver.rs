//! Import specifier resolution for JavaScript and TypeScript sources.
//!
//! Maps the raw specifier of an import to a file inside the project. Package
//! imports (`react`, `node:fs`) return `None` since there is no project file
//! to analyze.
//!
//! Resolution order:
//!
//! 1. A matching alias rewrites the specifier to the alias target
//! 2. Otherwise a relative specifier (`./x`, `../x`, `.`, `..`) is joined to the
//!    importing file's directory
//! 3. Anything else is unresolved
//!
//! The rewritten path is then probed as-is, with each of [`EXTENSIONS`]
//! appended, and finally as a directory holding `index` plus each extension.
//! The first regular file wins.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::config::AliasTable;
use crate::types::{FileIdentity, normalize_lexically};

/// Extensions probed, in order, when a specifier has no exact match.
pub const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

/// File stem probed inside a directory specifier.
pub const INDEX_FILE: &str = "index";

/// Resolve `specifier`, imported by `current_file`, to a project file.
///
/// # Returns
/// * `Some(FileIdentity)` - the first existing candidate
/// * `None` - a package import, or no candidate exists on disk
#[must_use]
pub fn resolve_import(
    current_file: &Path,
    specifier: &str,
    aliases: &AliasTable,
) -> Option<FileIdentity> {
    let base = if let Some(rewritten) = aliases.rewrite(specifier) {
        rewritten
    } else if is_relative(specifier) {
        current_file.parent()?.join(specifier)
    } else {
        return None;
    };

    let base = normalize_lexically(&base);
    let resolved = candidates(&base).find(|candidate| {
        let hit = candidate.is_file();
        trace!(candidate = %candidate.display(), hit, "Probing import candidate");
        hit
    })?;

    Some(FileIdentity::new(resolved))
}

/// Whether a specifier is relative to the importing file.
#[must_use]
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// All probe paths for `base`, in resolution order.
fn candidates(base: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    let literal = std::iter::once(base.to_path_buf());
    let with_extension = EXTENSIONS.iter().map(move |ext| append_extension(base, ext));
    let index = base.join(INDEX_FILE);
    let as_directory = EXTENSIONS
        .iter()
        .map(move |ext| append_extension(&index, ext));

    literal.chain(with_extension).chain(as_directory)
}

/// Append `ext` to the file name, keeping any existing dots (`a.service` -> `a.service.ts`).
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(ext);
    PathBuf::from(name)
}
