//! `ripple cycles` command implementation.

use std::path::PathBuf;

use colored::Colorize;

use super::display::display_path;
use super::{ProjectArgs, entry_or_configured, open_project};

/// Run the cycles command.
pub fn run(project: &ProjectArgs<'_>, entry: Option<PathBuf>) -> Result<(), ripple::Error> {
    let mut ripple = open_project(project)?;
    let entry = entry_or_configured(entry, &ripple)?;

    let result = ripple.build(&entry)?;
    let root = ripple.root();
    let cycles = result.graph().cycles();

    if cycles.is_empty() {
        println!("{}", "No circular imports detected.".green());
        return Ok(());
    }

    println!(
        "Found {} circular import chains:",
        cycles.len().to_string().red().bold()
    );
    println!();

    for (i, cycle) in cycles.iter().enumerate() {
        println!("  {} {}:", "Cycle".yellow().bold(), i + 1);

        // Display cycle as: a -> b -> c -> a
        let mut path_str = cycle
            .files
            .iter()
            .map(|f| display_path(f, root))
            .collect::<Vec<_>>()
            .join(" → ");

        if let Some(first) = cycle.files.first() {
            path_str.push_str(" → ");
            path_str.push_str(&display_path(first, root));
        }

        println!("    {}", path_str.dimmed());
    }

    Ok(())
}
