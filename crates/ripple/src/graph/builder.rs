//! Graph construction by depth-first traversal from an entry file.
//!
//! Each file is inspected once. A file that cannot be inspected stays in the
//! graph (it may still be imported) but contributes no edges and no exports;
//! the traversal carries on with everything else.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use super::{DependencyGraph, ExportTable, ProjectGraph};
use crate::config::AliasTable;
use crate::error::{Error, Result};
use crate::inspector::SourceInspector;
use crate::resolver::resolve_import;
use crate::types::{BuildStats, FileIdentity, UnresolvedImport};

/// State owned by a single graph construction.
struct BuildContext<'a, I: SourceInspector + ?Sized> {
    inspector: &'a mut I,
    aliases: &'a AliasTable,
    visited: HashSet<FileIdentity>,
    graph: DependencyGraph,
    exports: ExportTable,
    stats: BuildStats,
}

impl<I: SourceInspector + ?Sized> BuildContext<'_, I> {
    fn visit(&mut self, file: &FileIdentity) {
        if !self.visited.insert(file.clone()) {
            return;
        }
        self.graph.add_file(file);
        self.stats.files_visited += 1;
        debug!(file = %file, "Visiting file");

        let facts = match self.inspector.inspect(file.as_path()) {
            Ok(facts) => facts,
            Err(e) => {
                warn!(
                    file = %file,
                    kind = %e.kind,
                    error = %e.message,
                    "Cannot inspect file, skipping its imports and exports"
                );
                self.stats.errors.push(e);
                return;
            }
        };
        self.stats.files_inspected += 1;
        self.exports.record(file.clone(), facts.exports);

        for specifier in facts.imports {
            let Some(target) = resolve_import(file.as_path(), &specifier, self.aliases) else {
                trace!(file = %file, specifier = %specifier, "Import unresolved, no edge");
                self.stats.unresolved_imports.push(UnresolvedImport {
                    from: file.clone(),
                    specifier,
                });
                continue;
            };

            debug!(file = %file, specifier = %specifier, target = %target, "Resolved import");

            // Descend before recording the edge so node order is pre-order
            self.visit(&target);
            if self.graph.add_edge(file, &target) {
                self.stats.edges_recorded += 1;
            }
        }
    }
}

/// Build the dependency graph and export table reachable from `entry`.
///
/// # Errors
///
/// Returns `Error::EntryNotFound` if `entry` is not an existing regular file.
/// File-level failures below the entry are collected in
/// [`BuildStats::errors`] instead.
pub fn build_graph<I: SourceInspector + ?Sized>(
    entry: &Path,
    aliases: &AliasTable,
    inspector: &mut I,
) -> Result<ProjectGraph> {
    if !entry.is_file() {
        return Err(Error::EntryNotFound(entry.to_path_buf()));
    }
    let start = Instant::now();
    let entry = FileIdentity::new(entry);

    let mut ctx = BuildContext {
        inspector,
        aliases,
        visited: HashSet::new(),
        graph: DependencyGraph::new(),
        exports: ExportTable::new(),
        stats: BuildStats::default(),
    };
    ctx.visit(&entry);

    let BuildContext {
        graph,
        exports,
        mut stats,
        ..
    } = ctx;
    stats.duration = start.elapsed();

    info!(
        entry = %entry,
        files = stats.files_visited,
        edges = stats.edges_recorded,
        failed = stats.errors.len(),
        unresolved = stats.unresolved_imports.len(),
        duration = ?stats.duration,
        "Dependency graph built"
    );

    Ok(ProjectGraph::new(entry, graph, exports, stats))
}
