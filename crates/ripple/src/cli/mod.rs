//! CLI command implementations.

mod display;

pub mod cycles;
pub mod graph;
pub mod impact;

use std::path::{Path, PathBuf};

use ripple::{Config, Error, Ripple, parse_alias_flag};

/// Project selection shared by every command.
pub struct ProjectArgs<'a> {
    /// Project root directory
    pub root: &'a Path,
    /// Explicit configuration file, relative to the root
    pub config: Option<&'a Path>,
    /// Raw `PREFIX=DIR` alias flags
    pub aliases: &'a [String],
}

/// Load the project configuration and create an analyzer for it.
fn open_project(args: &ProjectArgs<'_>) -> Result<Ripple, Error> {
    let mut config = Config::load(args.root, args.config)?;
    for flag in args.aliases {
        let (prefix, target) = parse_alias_flag(flag)?;
        config = config.with_alias(prefix, &target);
    }
    Ripple::new(config)
}

/// The entry given on the command line, else the configured one.
fn entry_or_configured(entry: Option<PathBuf>, ripple: &Ripple) -> Result<PathBuf, Error> {
    entry
        .or_else(|| ripple.config().entry.clone())
        .ok_or(Error::MissingInput("entry file"))
}
