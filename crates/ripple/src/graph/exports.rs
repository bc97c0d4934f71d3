//! Export names per file.

use std::collections::HashMap;

use crate::types::FileIdentity;

/// Names each successfully inspected file exports.
///
/// Default exports appear under the synthetic name `default`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    exports: HashMap<FileIdentity, Vec<String>>,
}

impl ExportTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the exports of `file`, keeping source order and dropping repeats.
    ///
    /// A file with no exports is still recorded, with an empty list.
    pub fn record(&mut self, file: FileIdentity, names: impl IntoIterator<Item = String>) {
        let entry = self.exports.entry(file).or_default();
        for name in names {
            if !entry.contains(&name) {
                entry.push(name);
            }
        }
    }

    /// Exports of `file`, or `None` if it was never inspected successfully.
    #[must_use]
    pub fn exports_of(&self, file: &FileIdentity) -> Option<&[String]> {
        self.exports.get(file).map(Vec::as_slice)
    }

    /// Whether `file` exports `name`.
    #[must_use]
    pub fn exports(&self, file: &FileIdentity, name: &str) -> bool {
        self.exports_of(file)
            .is_some_and(|names| names.iter().any(|n| n == name))
    }

    /// Number of files recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    /// Whether no file has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}
