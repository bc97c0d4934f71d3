//! In-memory dependency graph and export table.
//!
//! ## Design
//!
//! - `DependencyGraph` interns each `FileIdentity` once into a petgraph
//!   `DiGraph`; node indices double as the discovery order of files
//! - Forward edges (`importer -> imported`) are stored once per pair
//! - `ExportTable` maps a file to the names it exports, in source order
//! - Both are produced by [`build_graph`] and handed out read-only inside a
//!   [`ProjectGraph`]
//!
//! ## Operations
//!
//! | Operation | Order |
//! |-----------|-------|
//! | `files()` | discovery order |
//! | `dependencies()` | order the imports were recorded |
//! | `dependents()` | discovery order of the importing files |
//! | `cycles()` | Tarjan's SCC, files in discovery order |

mod builder;
mod exports;

pub use builder::build_graph;
pub use exports::ExportTable;

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::types::{BuildStats, Cycle, FileIdentity};

/// Directed import graph over project files. Cycles are allowed.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<FileIdentity, ()>,
    nodes: HashMap<FileIdentity, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file, keeping its first discovery position.
    pub fn add_file(&mut self, file: &FileIdentity) {
        self.intern(file);
    }

    fn intern(&mut self, file: &FileIdentity) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(file) {
            return idx;
        }
        let idx = self.graph.add_node(file.clone());
        self.nodes.insert(file.clone(), idx);
        idx
    }

    /// Record that `from` imports `to`.
    ///
    /// Returns `false` if the edge was already present.
    pub fn add_edge(&mut self, from: &FileIdentity, to: &FileIdentity) -> bool {
        let from = self.intern(from);
        let to = self.intern(to);
        if self.graph.contains_edge(from, to) {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    /// Whether the file is part of the graph.
    #[must_use]
    pub fn contains(&self, file: &FileIdentity) -> bool {
        self.nodes.contains_key(file)
    }

    /// Whether `from` imports `to` directly.
    #[must_use]
    pub fn imports(&self, from: &FileIdentity, to: &FileIdentity) -> bool {
        match (self.nodes.get(from), self.nodes.get(to)) {
            (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct import edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Files in discovery order.
    pub fn files(&self) -> impl Iterator<Item = &FileIdentity> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Files `file` imports, in the order the imports were recorded.
    #[must_use]
    pub fn dependencies(&self, file: &FileIdentity) -> Vec<&FileIdentity> {
        let Some(&idx) = self.nodes.get(file) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        edges.sort_by_key(EdgeRef::id);
        edges.into_iter().map(|e| &self.graph[e.target()]).collect()
    }

    /// Files importing `file`, in discovery order.
    #[must_use]
    pub fn dependents(&self, file: &FileIdentity) -> Vec<&FileIdentity> {
        let Some(&idx) = self.nodes.get(file) else {
            return Vec::new();
        };
        let mut importers: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .collect();
        importers.sort_unstable();
        importers.into_iter().map(|i| &self.graph[i]).collect()
    }

    /// Circular import chains.
    ///
    /// Each strongly connected component with more than one file is a cycle,
    /// as is a file importing itself.
    #[must_use]
    pub fn cycles(&self) -> Vec<Cycle> {
        let mut components: Vec<Vec<NodeIndex>> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|mut scc| {
                scc.sort_unstable();
                scc
            })
            .collect();
        components.sort_unstable_by_key(|scc| scc[0]);

        components
            .into_iter()
            .map(|scc| Cycle {
                files: scc.into_iter().map(|i| self.graph[i].clone()).collect(),
            })
            .collect()
    }
}

/// The product of one graph construction: read-only once built.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    entry: FileIdentity,
    graph: DependencyGraph,
    exports: ExportTable,
    stats: BuildStats,
}

impl ProjectGraph {
    /// Assemble a project graph from parts.
    #[must_use]
    pub fn new(
        entry: FileIdentity,
        graph: DependencyGraph,
        exports: ExportTable,
        stats: BuildStats,
    ) -> Self {
        Self {
            entry,
            graph,
            exports,
            stats,
        }
    }

    /// The file traversal started from.
    #[must_use]
    pub fn entry(&self) -> &FileIdentity {
        &self.entry
    }

    /// Forward import graph.
    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Exports of every successfully inspected file.
    #[must_use]
    pub fn exports(&self) -> &ExportTable {
        &self.exports
    }

    /// Construction statistics and file-level errors.
    #[must_use]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }
}
