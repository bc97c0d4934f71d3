//! `ripple graph` command implementation.

use std::path::PathBuf;

use colored::Colorize;

use super::display::{display_path, print_files, print_skipped_files};
use super::{ProjectArgs, entry_or_configured, open_project};

/// Run the graph command.
pub fn run(
    project: &ProjectArgs<'_>,
    entry: Option<PathBuf>,
    json: bool,
) -> Result<(), ripple::Error> {
    let mut ripple = open_project(project)?;
    let entry = entry_or_configured(entry, &ripple)?;

    let result = ripple.build(&entry)?;
    let root = ripple.root();
    let graph = result.graph();
    let stats = result.stats();

    if json {
        let files: Vec<_> = graph
            .files()
            .map(|file| {
                serde_json::json!({
                    "file": display_path(file, root),
                    "imports": graph
                        .dependencies(file)
                        .into_iter()
                        .map(|dep| display_path(dep, root))
                        .collect::<Vec<_>>(),
                    "exports": result.exports().exports_of(file),
                })
            })
            .collect();
        let json = serde_json::json!({
            "entry": display_path(result.entry(), root),
            "files": files,
            "unresolved": stats
                .unresolved_imports
                .iter()
                .map(|u| serde_json::json!({
                    "from": display_path(&u.from, root),
                    "specifier": u.specifier,
                }))
                .collect::<Vec<_>>(),
        });
        let output = serde_json::to_string_pretty(&json).map_err(std::io::Error::other)?;
        println!("{output}");
        return Ok(());
    }

    for file in graph.files() {
        println!("{}", display_path(file, root).white().bold());
        match result.exports().exports_of(file) {
            Some(names) if !names.is_empty() => {
                println!("  {}: {}", "exports".dimmed(), names.join(", "));
            }
            Some(_) => {}
            None => println!("  {}", "(not inspected)".yellow()),
        }
        print_files(&graph.dependencies(file), root, "(no project imports)");
    }

    println!();
    println!(
        "{} {} files, {} imports",
        "Graph".green().bold(),
        graph.file_count(),
        graph.edge_count()
    );
    println!("{}: {:.2?}", "Duration".dimmed(), stats.duration);
    if !stats.unresolved_imports.is_empty() {
        println!(
            "{}: {} (packages or missing files)",
            "Unresolved imports".dimmed(),
            stats.unresolved_imports.len()
        );
    }

    print_skipped_files(stats, root);
    Ok(())
}
