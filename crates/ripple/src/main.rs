//! Ripple CLI - blast-radius analysis from the command line.
//!
//! Ripple builds the import graph of a JavaScript or TypeScript project and
//! reports every file affected by a change, with the reason why.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::ProjectArgs;
use cli::impact::ImpactArgs;

/// Ripple: what else breaks when this file changes?
#[derive(Parser)]
#[command(name = "ripple")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Configuration file, relative to the root (defaults to ripple.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Import alias as PREFIX=DIR, DIR relative to the root (repeatable)
    #[arg(short, long = "alias", value_name = "PREFIX=DIR", global = true)]
    aliases: Vec<String>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every file affected by a change
    Impact {
        /// Entry file the import graph is built from
        #[arg(short, long)]
        entry: Option<PathBuf>,

        /// File the change applies to
        #[arg(long)]
        changed: PathBuf,

        /// Kind of change: add, modify or delete
        #[arg(long, value_name = "KIND")]
        change: String,

        /// Export names touched by a modify (comma separated)
        #[arg(long, value_delimiter = ',')]
        exports: Vec<String>,

        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,

        /// Draw the tree with ASCII characters only
        #[arg(long)]
        ascii: bool,
    },

    /// Show the import graph reachable from an entry file
    Graph {
        /// Entry file the import graph is built from
        #[arg(short, long)]
        entry: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Detect circular imports
    Cycles {
        /// Entry file the import graph is built from
        #[arg(short, long)]
        entry: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Determine project root
    let root = match cli.root {
        Some(r) => r,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let project = ProjectArgs {
        root: &root,
        config: cli.config.as_deref(),
        aliases: &cli.aliases,
    };

    // Run the appropriate command
    let result = match cli.command {
        Commands::Impact {
            entry,
            changed,
            change,
            exports,
            json,
            ascii,
        } => cli::impact::run(
            &project,
            ImpactArgs {
                entry,
                changed,
                change,
                exports,
                json,
                ascii,
            },
        ),
        Commands::Graph { entry, json } => cli::graph::run(&project, entry, json),
        Commands::Cycles { entry } => cli::cycles::run(&project, entry),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
