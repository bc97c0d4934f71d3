//! Domain types for ripple impact analysis.
//!
//! These types represent the core domain model:
//! - **Identity**: `FileIdentity` (the key of every graph node)
//! - **Inputs**: `ChangeKind`, `ChangeDescriptor`, `ChangeRequest`
//! - **Transient**: `SourceFacts` (inspection result)
//! - **Results**: `ImpactNode`, `BuildStats`, `Cycle`
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | File identity | Normalized absolute path | Same file reached via `./a` and `../x/a` must compare equal |
//! | Change kind | Two enums | Inputs can never carry the synthetic `affected` marker |
//! | Reason | `Option<String>` | The root has none, every other node has one |
//! | Modified exports | `Vec<String>` | Reasons list names in the order the caller supplied them |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, InspectError};

// ============================================================================
// File identity
// ============================================================================

/// Canonical identity of a source file.
///
/// Existing files are canonicalized; paths that do not exist (a deleted file,
/// say) are made absolute and normalized lexically so that `.` and `..`
/// components never produce two identities for one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileIdentity(PathBuf);

impl FileIdentity {
    /// Build the identity of `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(canonical) = path.canonicalize() {
            return Self(canonical);
        }
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self(normalize_lexically(&absolute))
    }

    /// The underlying absolute path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// The path relative to `root`, or the full path when it lies outside `root`.
    #[must_use]
    pub fn relative_to(&self, root: &Path) -> &Path {
        self.0.strip_prefix(root).unwrap_or(&self.0)
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for FileIdentity {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Remove `.` components and fold `..` into the preceding component.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

// ============================================================================
// Enums
// ============================================================================

/// Source languages the default inspector understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// TypeScript (`.ts`, `.mts`, `.cts`)
    TypeScript,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
    /// JavaScript, JSX included (`.js`, `.jsx`, `.mjs`, `.cjs`)
    JavaScript,
}

impl Language {
    /// File extensions handled by this language.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::Tsx => &["tsx"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
        }
    }

    /// Detect language from file extension.
    ///
    /// # Returns
    ///
    /// `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Detect language from a file path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Kind of change applied to the changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The file is new
    Add,
    /// The file was edited
    Modify,
    /// The file was removed
    Delete,
}

impl ChangeKind {
    /// Lowercase name as accepted on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "modify" => Ok(Self::Modify),
            "delete" => Ok(Self::Delete),
            _ => Err(Error::InvalidChangeKind(s.to_string())),
        }
    }
}

/// Change kind carried by a node of the impact tree.
///
/// The root carries the literal change; every other node is `Affected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactKind {
    /// Root of an `add` analysis
    Add,
    /// Root of a `modify` analysis
    Modify,
    /// Root of a `delete` analysis
    Delete,
    /// Transitively affected dependent
    Affected,
}

impl ImpactKind {
    /// Lowercase display name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Modify => "modify",
            Self::Delete => "delete",
            Self::Affected => "affected",
        }
    }
}

impl From<ChangeKind> for ImpactKind {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Add => Self::Add,
            ChangeKind::Modify => Self::Modify,
            ChangeKind::Delete => Self::Delete,
        }
    }
}

impl fmt::Display for ImpactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// A single change to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDescriptor {
    /// The file that changed
    pub target_file: FileIdentity,
    /// What happened to it
    pub change_type: ChangeKind,
    /// Export names that changed, exactly in caller order.
    /// Only consulted for `Modify`.
    pub modified_export_names: Vec<String>,
}

impl ChangeDescriptor {
    /// Describe a change with no specific export names.
    #[must_use]
    pub fn new(target_file: FileIdentity, change_type: ChangeKind) -> Self {
        Self {
            target_file,
            change_type,
            modified_export_names: Vec::new(),
        }
    }

    /// Attach the modified export names, trimmed, dropping blanks.
    #[must_use]
    pub fn with_modified_exports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into().trim().to_string();
            if !name.is_empty() {
                self.modified_export_names.push(name);
            }
        }
        self
    }
}

/// Raw inputs of an impact run, as supplied on the command line.
///
/// Nothing is trusted until [`ChangeRequest::validate`] succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Entry file; falls back to the configured entry when absent
    pub entry: Option<PathBuf>,
    /// File the change applies to
    pub changed: Option<PathBuf>,
    /// `add`, `modify` or `delete`
    pub change: Option<String>,
    /// Export names touched by a `modify`
    pub modified_exports: Vec<String>,
}

impl ChangeRequest {
    /// Check that every input is present and well formed.
    ///
    /// Returns the entry path and the change descriptor.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingInput` naming the first absent input, or
    /// `Error::InvalidChangeKind` for an unknown change kind.
    pub fn validate(
        self,
        default_entry: Option<&Path>,
    ) -> Result<(PathBuf, ChangeDescriptor), Error> {
        let entry = self
            .entry
            .or_else(|| default_entry.map(Path::to_path_buf))
            .ok_or(Error::MissingInput("entry file"))?;
        let changed = self.changed.ok_or(Error::MissingInput("changed file"))?;
        let change: ChangeKind = self
            .change
            .ok_or(Error::MissingInput("change kind"))?
            .parse()?;

        let descriptor = ChangeDescriptor::new(FileIdentity::new(changed), change)
            .with_modified_exports(self.modified_exports);
        Ok((entry, descriptor))
    }
}

/// Imports and exports of one file, in source order.
///
/// Produced by a `SourceInspector`; transient, never stored as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFacts {
    /// Raw specifiers as written (`"./util"`, `"react"`, ...)
    pub imports: Vec<String>,
    /// Exported names without duplicates, `default` for a default export
    pub exports: Vec<String>,
}

impl SourceFacts {
    /// Record an export name unless it is already present.
    pub fn push_export(&mut self, name: String) {
        if !self.exports.contains(&name) {
            self.exports.push(name);
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// A node in the impact tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactNode {
    /// The file this node reports on
    pub file: FileIdentity,
    /// Literal change kind for the root, `Affected` otherwise
    pub change_type: ImpactKind,
    /// Why this file is affected (absent on the root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Dependents reached through this file, in scan order
    pub children: Vec<ImpactNode>,
}

impl ImpactNode {
    /// Create a childless node without a reason.
    #[must_use]
    pub fn new(file: FileIdentity, change_type: ImpactKind) -> Self {
        Self {
            file,
            change_type,
            reason: None,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ImpactNode::node_count)
            .sum::<usize>()
    }

    /// Number of levels below this node (0 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// All files in this subtree in pre-order.
    #[must_use]
    pub fn files(&self) -> Vec<&FileIdentity> {
        let mut files = Vec::with_capacity(self.node_count());
        self.collect_files(&mut files);
        files
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileIdentity>) {
        out.push(&self.file);
        for child in &self.children {
            child.collect_files(out);
        }
    }

    /// Find the node for `file` in this subtree.
    #[must_use]
    pub fn find(&self, file: &FileIdentity) -> Option<&ImpactNode> {
        if &self.file == file {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(file))
    }
}

/// An import specifier the resolver could not map to a project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedImport {
    /// File containing the import
    pub from: FileIdentity,
    /// Specifier as written in source
    pub specifier: String,
}

/// Statistics from one graph construction.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Files visited, including ones that failed inspection
    pub files_visited: usize,
    /// Files whose imports and exports were recorded
    pub files_inspected: usize,
    /// Distinct forward edges recorded
    pub edges_recorded: usize,
    /// Time spent building
    pub duration: Duration,
    /// File-level failures, in visit order
    pub errors: Vec<InspectError>,
    /// Specifiers that stay outside the graph (packages, missing files)
    pub unresolved_imports: Vec<UnresolvedImport>,
}

/// A circular import chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Files in the cycle, in discovery order
    pub files: Vec<FileIdentity>,
}
