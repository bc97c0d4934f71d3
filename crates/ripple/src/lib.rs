//! # Ripple: Blast-Radius Analysis for JavaScript and TypeScript
//!
//! Ripple answers "if I change this file, what else is affected?". It walks
//! the import graph of a project from an entry file, then propagates a change
//! backwards through every file that imports the changed one, explaining at
//! each step why a file is affected.
//!
//! ## Design Philosophy
//!
//! - **Static and approximate** - Imports are read with tree-sitter, nothing is executed
//! - **Best effort** - A malformed file costs only its own edges, never the run
//! - **Deterministic** - The same project and change always produce the same tree
//! - **Library first, CLI second**
//!
//! ## Quick Start
//!
//! ```no_run
//! use ripple::{ChangeRequest, Config, Ripple};
//! use std::path::{Path, PathBuf};
//!
//! let config = Config::load(Path::new("/path/to/project"), None)?;
//! let mut ripple = Ripple::new(config)?;
//!
//! let report = ripple.analyze(ChangeRequest {
//!     entry: Some(PathBuf::from("src/index.ts")),
//!     changed: Some(PathBuf::from("src/util.ts")),
//!     change: Some("modify".to_string()),
//!     modified_exports: vec!["formatDate".to_string()],
//! })?;
//! println!("{} files affected", report.tree.node_count() - 1);
//! # Ok::<(), ripple::Error>(())
//! ```

mod config;
mod error;
mod graph;
mod impact;
mod inspector;
mod languages;
mod resolver;
mod types;

pub use config::{
    Alias, AliasTable, CONFIG_FILE_NAME, Config, ConfigFile, TSCONFIG_FILE_NAME, parse_alias_flag,
};
pub use error::{Error, InspectError, InspectErrorKind, Result};
pub use graph::{DependencyGraph, ExportTable, ProjectGraph, build_graph};
pub use impact::{
    ADDED_REASON, DELETED_REASON, MODIFIED_EXPORTS_PREFIX, MODIFIED_REASON,
    analyze_impact, analyze_with_visited, reason_for,
};
pub use inspector::{SourceInspector, TreeSitterInspector};
pub use languages::typescript::DEFAULT_EXPORT;
pub use resolver::{EXTENSIONS, INDEX_FILE, is_relative, resolve_import};
pub use types::{
    BuildStats, ChangeDescriptor, ChangeKind, ChangeRequest, Cycle, FileIdentity, ImpactKind,
    ImpactNode, Language, SourceFacts, UnresolvedImport,
};

use std::path::{Path, PathBuf};

use tracing::debug;

/// Outcome of one impact analysis.
#[derive(Debug, Clone)]
pub struct ImpactReport {
    /// The impact tree rooted at the changed file
    pub tree: ImpactNode,
    /// The project graph the tree was computed from
    pub project: ProjectGraph,
}

/// Blast-radius analysis over one project.
///
/// `Ripple` owns the project configuration and a reusable tree-sitter
/// inspector. Every call to [`Ripple::build`] or [`Ripple::analyze`] starts
/// from a fresh graph, so results never leak between runs.
pub struct Ripple {
    config: Config,
    inspector: TreeSitterInspector,
}

impl Ripple {
    /// Create an analyzer for the project described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parser` if a tree-sitter grammar cannot be loaded.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            inspector: TreeSitterInspector::new()?,
        })
    }

    /// Project configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// `path` joined onto the project root unless it is already absolute.
    #[must_use]
    pub fn project_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.root.join(path)
        }
    }

    /// Build the dependency graph reachable from `entry`.
    ///
    /// A relative `entry` is taken from the project root.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntryNotFound` if `entry` is not an existing file.
    pub fn build(&mut self, entry: &Path) -> Result<ProjectGraph> {
        let entry = self.project_path(entry);
        build_graph(&entry, &self.config.aliases, &mut self.inspector)
    }

    /// Validate `request`, build the graph and compute the impact tree.
    ///
    /// The entry falls back to the configured one. Relative entry and
    /// changed paths are taken from the project root. All inputs are checked
    /// before any file is read.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingInput` or `Error::InvalidChangeKind` for bad
    /// inputs, and `Error::EntryNotFound` if the entry does not exist.
    pub fn analyze(&mut self, mut request: ChangeRequest) -> Result<ImpactReport> {
        request.changed = request.changed.map(|path| self.project_path(&path));
        let (entry, descriptor) = request.validate(self.config.entry.as_deref())?;
        debug!(
            entry = %entry.display(),
            changed = %descriptor.target_file,
            change = %descriptor.change_type,
            "Analyzing change"
        );

        let project = self.build(&entry)?;
        let tree = analyze_impact(&descriptor, &project);
        Ok(ImpactReport { tree, project })
    }
}
