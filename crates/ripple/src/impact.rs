//! Reverse propagation of a change through the dependency graph.
//!
//! Starting at the changed file, every file that imports it becomes a child
//! node, then every file importing one of those, and so on. Each file
//! appears at most once in the tree: the first path that reaches it wins.
//!
//! ## Reasons
//!
//! | Parent change | Reason on each child |
//! |---------------|----------------------|
//! | `delete` | `file was deleted` |
//! | `add` | `new file was added` |
//! | `modify`, named exports of the parent | `modified exports: a, b` |
//! | `modify`, anything else | `file was modified` |
//! | `affected` | `file was modified` |

use std::collections::HashSet;

use tracing::debug;

use crate::graph::{DependencyGraph, ExportTable, ProjectGraph};
use crate::types::{ChangeDescriptor, FileIdentity, ImpactKind, ImpactNode};

/// Reason given to dependents of a deleted file.
pub const DELETED_REASON: &str = "file was deleted";
/// Reason given to dependents of an added file.
pub const ADDED_REASON: &str = "new file was added";
/// Reason given to dependents of a modified file when no named export is
/// known to change, and to dependents of an affected file.
pub const MODIFIED_REASON: &str = "file was modified";
/// Prefix of the reason listing modified exports.
pub const MODIFIED_EXPORTS_PREFIX: &str = "modified exports: ";

/// Why a dependent of a file with `change` is affected.
///
/// `exports` are the exports of the file carrying `change`. For `Modify`,
/// the names in `modified` that it actually exports are listed, in
/// `modified` order. An `Affected` file never carries named exports of its
/// own, so its dependents get the plain modified reason.
#[must_use]
pub fn reason_for(change: ImpactKind, modified: &[String], exports: Option<&[String]>) -> String {
    match change {
        ImpactKind::Delete => DELETED_REASON.to_string(),
        ImpactKind::Add => ADDED_REASON.to_string(),
        ImpactKind::Affected => MODIFIED_REASON.to_string(),
        ImpactKind::Modify => {
            let exports = exports.unwrap_or_default();
            let touched: Vec<&str> = modified
                .iter()
                .filter(|name| exports.contains(*name))
                .map(String::as_str)
                .collect();
            if touched.is_empty() {
                MODIFIED_REASON.to_string()
            } else {
                format!("{MODIFIED_EXPORTS_PREFIX}{}", touched.join(", "))
            }
        }
    }
}

/// State threaded through one analysis.
struct AnalysisContext<'a> {
    graph: &'a DependencyGraph,
    exports: &'a ExportTable,
    modified: &'a [String],
    visited: &'a mut HashSet<FileIdentity>,
}

impl AnalysisContext<'_> {
    fn analyze(&mut self, file: &FileIdentity, change: ImpactKind) -> ImpactNode {
        let mut node = ImpactNode::new(file.clone(), change);
        let reason = reason_for(change, self.modified, self.exports.exports_of(file));

        for dependent in self.graph.dependents(file) {
            // Earlier siblings' subtrees may already have claimed this file
            if !self.visited.insert(dependent.clone()) {
                continue;
            }
            let mut child = self.analyze(dependent, ImpactKind::Affected);
            child.reason = Some(reason.clone());
            node.children.push(child);
        }
        node
    }
}

/// Build the impact subtree of `file` without revisiting anything in `visited`.
///
/// Each file added to the tree is inserted into `visited`. `file` itself is
/// not inserted; callers starting a fresh analysis should use
/// [`analyze_impact`], which seeds it.
#[must_use]
pub fn analyze_with_visited(
    file: &FileIdentity,
    change: ImpactKind,
    modified: &[String],
    graph: &DependencyGraph,
    exports: &ExportTable,
    visited: &mut HashSet<FileIdentity>,
) -> ImpactNode {
    AnalysisContext {
        graph,
        exports,
        modified,
        visited,
    }
    .analyze(file, change)
}

/// Impact tree for a change against a built project.
///
/// The root is the changed file with the literal change kind and no reason.
/// A file outside the graph yields a root with no children.
#[must_use]
pub fn analyze_impact(descriptor: &ChangeDescriptor, project: &ProjectGraph) -> ImpactNode {
    let root = &descriptor.target_file;
    if !project.graph().contains(root) {
        debug!(file = %root, "Changed file is not reachable from the entry");
    }

    let mut visited = HashSet::from([root.clone()]);
    let tree = analyze_with_visited(
        root,
        descriptor.change_type.into(),
        &descriptor.modified_export_names,
        project.graph(),
        project.exports(),
        &mut visited,
    );

    debug!(
        file = %root,
        change = %descriptor.change_type,
        affected = tree.node_count() - 1,
        depth = tree.depth(),
        "Impact analyzed"
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuildStats, ChangeKind};
    use rstest::rstest;

    fn file(name: &str) -> FileIdentity {
        FileIdentity::new(format!("/project/src/{name}.ts"))
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    /// Graph from `(importer, imported)` pairs; files are recorded in first-seen order.
    fn project(edges: &[(&str, &str)], exports: &[(&str, &[&str])]) -> ProjectGraph {
        let mut graph = DependencyGraph::new();
        for (from, to) in edges {
            graph.add_file(&file(from));
            graph.add_file(&file(to));
        }
        for (from, to) in edges {
            graph.add_edge(&file(from), &file(to));
        }
        let mut table = ExportTable::new();
        for (name, list) in exports {
            table.record(file(name), names(list));
        }
        let entry = graph.files().next().cloned().unwrap_or_else(|| file("index"));
        ProjectGraph::new(entry, graph, table, BuildStats::default())
    }

    fn modify(name: &str, exports: &[&str]) -> ChangeDescriptor {
        ChangeDescriptor::new(file(name), ChangeKind::Modify)
            .with_modified_exports(exports.iter().copied())
    }

    #[rstest]
    #[case::delete(ImpactKind::Delete, &[], DELETED_REASON)]
    #[case::add(ImpactKind::Add, &[], ADDED_REASON)]
    #[case::affected(ImpactKind::Affected, &["foo"], MODIFIED_REASON)]
    #[case::modify_plain(ImpactKind::Modify, &[], MODIFIED_REASON)]
    #[case::modify_unknown_name(ImpactKind::Modify, &["nope"], MODIFIED_REASON)]
    #[case::modify_named(ImpactKind::Modify, &["bar", "nope", "foo"], "modified exports: bar, foo")]
    #[case::modify_repeated(ImpactKind::Modify, &["foo", "bar", "foo"], "modified exports: foo, bar, foo")]
    fn reasons(#[case] change: ImpactKind, #[case] modified: &[&str], #[case] expected: &str) {
        let exports = names(&["foo", "bar"]);
        assert_eq!(reason_for(change, &names(modified), Some(&exports)), expected);
    }

    #[test]
    fn modify_without_recorded_exports_is_plain() {
        assert_eq!(
            reason_for(ImpactKind::Modify, &names(&["foo"]), None),
            MODIFIED_REASON
        );
    }

    #[test]
    fn modified_export_reaches_importer() {
        let project = project(&[("index", "a"), ("index", "b")], &[("a", &["foo"]), ("b", &[])]);

        let tree = analyze_impact(&modify("a", &["foo"]), &project);

        assert_eq!(tree.change_type, ImpactKind::Modify);
        assert!(tree.reason.is_none());
        assert_eq!(tree.children.len(), 1);
        let child = &tree.children[0];
        assert_eq!(child.file, file("index"));
        assert_eq!(child.change_type, ImpactKind::Affected);
        assert_eq!(child.reason.as_deref(), Some("modified exports: foo"));
        assert!(child.children.is_empty());
    }

    #[test]
    fn deleted_file_lists_dependents_in_discovery_order() {
        let project = project(&[("index", "x"), ("index", "y"), ("x", "c"), ("y", "c")], &[]);

        let tree = analyze_impact(&ChangeDescriptor::new(file("c"), ChangeKind::Delete), &project);

        let children: Vec<_> = tree.children.iter().map(|c| c.file.clone()).collect();
        assert_eq!(children, vec![file("x"), file("y")]);
        assert!(tree.children.iter().all(|c| c.reason.as_deref() == Some(DELETED_REASON)));
    }

    #[test]
    fn grandchildren_of_added_file_are_plainly_modified() {
        let project = project(&[("index", "a"), ("a", "b")], &[]);

        let tree = analyze_impact(&ChangeDescriptor::new(file("b"), ChangeKind::Add), &project);

        let a = &tree.children[0];
        assert_eq!(a.reason.as_deref(), Some(ADDED_REASON));
        assert_eq!(a.children[0].file, file("index"));
        assert_eq!(a.children[0].reason.as_deref(), Some(MODIFIED_REASON));
    }

    #[test]
    fn diamond_reports_shared_dependent_once() {
        // index imports a and b, both import c
        let project = project(&[("index", "a"), ("index", "b"), ("a", "c"), ("b", "c")], &[]);

        let tree = analyze_impact(&ChangeDescriptor::new(file("c"), ChangeKind::Delete), &project);

        let files = tree.files();
        assert_eq!(files.iter().filter(|f| ***f == file("index")).count(), 1);
        assert_eq!(tree.node_count(), 4);
        // index is claimed under a, the first dependent scanned
        assert!(tree.children[0].find(&file("index")).is_some());
        assert!(tree.children[1].children.is_empty());
    }

    #[test]
    fn cycle_does_not_revisit_root() {
        let project = project(&[("a", "b"), ("b", "a")], &[]);

        let tree = analyze_impact(&ChangeDescriptor::new(file("a"), ChangeKind::Delete), &project);

        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.children[0].file, file("b"));
        assert!(tree.children[0].children.is_empty());
    }

    #[test]
    fn self_import_is_ignored() {
        let project = project(&[("a", "a"), ("index", "a")], &[]);

        let tree = analyze_impact(&ChangeDescriptor::new(file("a"), ChangeKind::Delete), &project);

        assert_eq!(tree.files(), vec![&file("a"), &file("index")]);
    }

    #[test]
    fn file_outside_graph_has_no_children() {
        let project = project(&[("index", "a")], &[]);

        let tree = analyze_impact(&ChangeDescriptor::new(file("ghost"), ChangeKind::Add), &project);

        assert_eq!(tree.file, file("ghost"));
        assert_eq!(tree.change_type, ImpactKind::Add);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn modify_only_lists_names_of_the_changed_file() {
        // index also exports foo, but only the changed file's names count
        let project = project(
            &[("index", "a"), ("app", "index")],
            &[("a", &["foo"]), ("index", &["foo"])],
        );

        let tree = analyze_impact(&modify("a", &["foo"]), &project);

        let index = &tree.children[0];
        assert_eq!(index.reason.as_deref(), Some("modified exports: foo"));
        assert_eq!(index.children[0].reason.as_deref(), Some(MODIFIED_REASON));
    }

    #[test]
    fn caller_visited_set_is_respected() {
        let project = project(&[("index", "a"), ("other", "a")], &[]);
        let mut visited = HashSet::from([file("a"), file("index")]);

        let tree = analyze_with_visited(
            &file("a"),
            ImpactKind::Delete,
            &[],
            project.graph(),
            project.exports(),
            &mut visited,
        );

        assert_eq!(tree.files(), vec![&file("a"), &file("other")]);
        assert!(visited.contains(&file("other")));
    }
}
