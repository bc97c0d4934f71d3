//! `ripple impact` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use ripple::ChangeRequest;

use super::display::{OutputConfig, impact_to_json, print_skipped_files, write_impact_tree};
use super::{ProjectArgs, open_project};

/// Options of the impact command.
pub struct ImpactArgs {
    /// Entry file, if not configured
    pub entry: Option<PathBuf>,
    /// File the change applies to
    pub changed: PathBuf,
    /// `add`, `modify` or `delete`
    pub change: String,
    /// Export names touched by a `modify`
    pub exports: Vec<String>,
    /// Emit JSON instead of a tree
    pub json: bool,
    /// Force ASCII connectors
    pub ascii: bool,
}

/// Run the impact command.
pub fn run(project: &ProjectArgs<'_>, args: ImpactArgs) -> Result<(), ripple::Error> {
    let mut ripple = open_project(project)?;

    let report = ripple.analyze(ChangeRequest {
        entry: args.entry,
        changed: Some(args.changed),
        change: Some(args.change),
        modified_exports: args.exports,
    })?;
    let root = ripple.root();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        let json = impact_to_json(&report.tree, root);
        let output = serde_json::to_string_pretty(&json).map_err(io::Error::other)?;
        writeln!(handle, "{output}")?;
    } else {
        let config = OutputConfig::from_env().with_ascii(args.ascii);
        write_impact_tree(&mut handle, &report.tree, root, &config)?;

        let affected = report.tree.node_count() - 1;
        writeln!(handle)?;
        if affected == 0 {
            writeln!(handle, "{}", "No other files are affected.".green())?;
        } else {
            writeln!(
                handle,
                "{} {} file(s) affected, {} level(s) deep",
                "Impact:".white().bold(),
                affected.to_string().yellow().bold(),
                report.tree.depth()
            )?;
        }
        if !report.project.graph().contains(&report.tree.file) {
            writeln!(
                handle,
                "{}",
                "The changed file is not reachable from the entry.".dimmed()
            )?;
        }
    }

    print_skipped_files(report.project.stats(), root);
    Ok(())
}
