//! Project configuration: the root directory, a default entry file and the
//! import alias table.
//!
//! Sources, lowest precedence first:
//!
//! 1. `tsconfig.json` `compilerOptions.paths` in the project root
//! 2. `ripple.yaml` in the project root, or an explicit `--config` file
//! 3. `--alias PREFIX=DIR` flags, applied by the caller with [`Config::with_alias`]
//!
//! ```yaml
//! entry: src/index.ts
//! aliases:
//!   "@/": src/
//!   "~shared/": ../shared/
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::normalize_lexically;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "ripple.yaml";

/// Name of the TypeScript project file consulted for path aliases.
pub const TSCONFIG_FILE_NAME: &str = "tsconfig.json";

/// A specifier rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Specifier prefix, e.g. `@/`
    pub prefix: String,
    /// Absolute directory (or file, for exact aliases) the prefix maps to
    pub target: PathBuf,
    /// Match only a specifier equal to `prefix`
    pub exact: bool,
}

/// Ordered set of aliases; the longest matching prefix wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: Vec<Alias>,
}

impl AliasTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prefix alias, replacing any alias with the same prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, target: impl Into<PathBuf>) {
        self.upsert(Alias {
            prefix: prefix.into(),
            target: target.into(),
            exact: false,
        });
    }

    /// Add an alias that only matches the whole specifier.
    pub fn insert_exact(&mut self, specifier: impl Into<String>, target: impl Into<PathBuf>) {
        self.upsert(Alias {
            prefix: specifier.into(),
            target: target.into(),
            exact: true,
        });
    }

    fn upsert(&mut self, alias: Alias) {
        if let Some(existing) = self.aliases.iter_mut().find(|a| a.prefix == alias.prefix) {
            *existing = alias;
        } else {
            self.aliases.push(alias);
        }
    }

    /// Rewrite `specifier` through the best matching alias.
    ///
    /// Returns `None` when no alias matches.
    #[must_use]
    pub fn rewrite(&self, specifier: &str) -> Option<PathBuf> {
        let alias = self
            .aliases
            .iter()
            .filter(|a| {
                if a.exact {
                    specifier == a.prefix
                } else {
                    !a.prefix.is_empty() && specifier.starts_with(&a.prefix)
                }
            })
            .max_by_key(|a| a.prefix.len())?;

        let rest = specifier[alias.prefix.len()..].trim_start_matches('/');
        if rest.is_empty() {
            Some(alias.target.clone())
        } else {
            Some(alias.target.join(rest))
        }
    }

    /// Number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the table has no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterate aliases in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.iter()
    }
}

/// On-disk shape of `ripple.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigFile {
    /// Default entry file, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Specifier prefix -> directory relative to the project root
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it is not valid YAML of the expected shape.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    #[serde(default)]
    compiler_options: TsCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsCompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: BTreeMap<String, Vec<String>>,
}

/// Resolved configuration for one analysis.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute project root; alias targets and displayed paths are relative to it
    pub root: PathBuf,
    /// Entry file from the configuration file, if any
    pub entry: Option<PathBuf>,
    /// Import aliases with absolute targets
    pub aliases: AliasTable,
}

impl Config {
    /// Configuration with no aliases rooted at `root`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let root = root
            .canonicalize()
            .unwrap_or_else(|_| normalize_lexically(root));
        Self {
            root,
            entry: None,
            aliases: AliasTable::new(),
        }
    }

    /// Load configuration for the project at `root`.
    ///
    /// When `config_file` is `None`, `ripple.yaml` in the root is used if present.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the root does not exist or an explicit
    /// configuration file cannot be read, and `Error::Config` if the
    /// configuration file is malformed.
    pub fn load(root: &Path, config_file: Option<&Path>) -> Result<Self> {
        let root = root.canonicalize().map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("project root not found: {}", root.display()),
            ))
        })?;
        let mut config = Self::new(&root);

        config.apply_tsconfig(&root.join(TSCONFIG_FILE_NAME));

        let file = match config_file {
            Some(path) => Some(ConfigFile::load(&root.join(path))?),
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    Some(ConfigFile::load(&default_path)?)
                } else {
                    None
                }
            }
        };

        if let Some(file) = file {
            config.entry = file.entry.map(|entry| config.root.join(entry));
            for (prefix, target) in file.aliases {
                config = config.with_alias(prefix, &target);
            }
        }

        debug!(
            root = %config.root.display(),
            aliases = config.aliases.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Add a prefix alias whose target is relative to the project root.
    #[must_use]
    pub fn with_alias(mut self, prefix: impl Into<String>, target: &str) -> Self {
        let target = normalize_lexically(&self.root.join(target));
        self.aliases.insert(prefix, target);
        self
    }

    /// Read `compilerOptions.paths` from a tsconfig file, if present.
    ///
    /// A file that is not plain JSON (tsconfig allows comments) is skipped
    /// with a warning.
    fn apply_tsconfig(&mut self, path: &Path) {
        let Ok(content) = std::fs::read_to_string(path) else {
            return;
        };
        let tsconfig: TsConfig = match serde_json::from_str(&content) {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    file = %path.display(),
                    error = %e,
                    "Cannot parse tsconfig, ignoring its path aliases"
                );
                return;
            }
        };

        let options = tsconfig.compiler_options;
        let base = normalize_lexically(&self.root.join(options.base_url.as_deref().unwrap_or(".")));
        for (pattern, targets) in options.paths {
            let Some(first) = targets.first() else {
                continue;
            };
            match (pattern.strip_suffix('*'), first.strip_suffix('*')) {
                (Some(prefix), Some(target)) => {
                    self.aliases
                        .insert(prefix, normalize_lexically(&base.join(target)));
                }
                (None, _) => {
                    self.aliases
                        .insert_exact(pattern.clone(), normalize_lexically(&base.join(first)));
                }
                (Some(_), None) => {
                    debug!(pattern = %pattern, target = %first, "Skipping tsconfig path without wildcard target");
                }
            }
        }
    }
}

/// Parse a `PREFIX=DIR` alias flag.
///
/// # Errors
///
/// Returns `Error::Config` when the flag has no `=` or an empty prefix or target.
pub fn parse_alias_flag(flag: &str) -> Result<(String, String)> {
    let (prefix, target) = flag
        .split_once('=')
        .ok_or_else(|| Error::Config(format!("alias must look like PREFIX=DIR, got `{flag}`")))?;
    if prefix.is_empty() || target.is_empty() {
        return Err(Error::Config(format!(
            "alias prefix and target must be non-empty, got `{flag}`"
        )));
    }
    Ok((prefix.to_string(), target.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn table() -> AliasTable {
        let mut table = AliasTable::new();
        table.insert("@/", "/project/src");
        table.insert("@/components/", "/project/ui/components");
        table.insert_exact("config", "/project/config/index.ts");
        table
    }

    #[rstest]
    #[case::prefix("@/util", Some("/project/src/util"))]
    #[case::longest_prefix_wins("@/components/button", Some("/project/ui/components/button"))]
    #[case::exact("config", Some("/project/config/index.ts"))]
    #[case::exact_does_not_prefix("config/extra", None)]
    #[case::bare("react", None)]
    #[case::relative("./util", None)]
    fn rewrite_uses_best_alias(#[case] specifier: &str, #[case] expected: Option<&str>) {
        assert_eq!(table().rewrite(specifier), expected.map(PathBuf::from));
    }

    #[test]
    fn insert_replaces_same_prefix() {
        let mut table = AliasTable::new();
        table.insert("@/", "/a");
        table.insert("@/", "/b");

        assert_eq!(table.len(), 1);
        assert_eq!(table.rewrite("@/x"), Some(PathBuf::from("/b/x")));
    }

    #[rstest]
    #[case::simple("@/=src/", ("@/", "src/"))]
    #[case::equals_in_target("~=dir=odd", ("~", "dir=odd"))]
    fn alias_flag_parses(#[case] flag: &str, #[case] expected: (&str, &str)) {
        let (prefix, target) = parse_alias_flag(flag).expect("should parse");
        assert_eq!((prefix.as_str(), target.as_str()), expected);
    }

    #[rstest]
    #[case::no_equals("@/src")]
    #[case::empty_prefix("=src")]
    #[case::empty_target("@/=")]
    fn alias_flag_rejects_malformed(#[case] flag: &str) {
        assert!(matches!(parse_alias_flag(flag), Err(Error::Config(_))));
    }

    #[test]
    fn load_reads_yaml_aliases_and_entry() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "entry: src/index.ts\naliases:\n  \"@/\": src/\n",
        )
        .expect("should write config");

        let config = Config::load(dir.path(), None).expect("should load");
        let root = dir.path().canonicalize().expect("should canonicalize");

        assert_eq!(config.entry, Some(root.join("src/index.ts")));
        assert_eq!(config.aliases.rewrite("@/util"), Some(root.join("src/util")));
    }

    #[test]
    fn load_reads_tsconfig_paths() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        fs::write(
            dir.path().join(TSCONFIG_FILE_NAME),
            r#"{
  "compilerOptions": {
    "baseUrl": "./app",
    "paths": {
      "@lib/*": ["lib/*"],
      "settings": ["config/settings.ts"]
    }
  }
}"#,
        )
        .expect("should write tsconfig");

        let config = Config::load(dir.path(), None).expect("should load");
        let root = dir.path().canonicalize().expect("should canonicalize");

        assert_eq!(
            config.aliases.rewrite("@lib/math"),
            Some(root.join("app/lib/math"))
        );
        assert_eq!(
            config.aliases.rewrite("settings"),
            Some(root.join("app/config/settings.ts"))
        );
    }

    #[test]
    fn yaml_aliases_override_tsconfig() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        fs::write(
            dir.path().join(TSCONFIG_FILE_NAME),
            r#"{"compilerOptions": {"paths": {"@/*": ["old/*"]}}}"#,
        )
        .expect("should write tsconfig");
        fs::write(dir.path().join(CONFIG_FILE_NAME), "aliases:\n  \"@/\": new/\n")
            .expect("should write config");

        let config = Config::load(dir.path(), None).expect("should load");
        let root = dir.path().canonicalize().expect("should canonicalize");

        assert_eq!(config.aliases.rewrite("@/x"), Some(root.join("new/x")));
    }

    #[test]
    fn tsconfig_with_comments_is_ignored() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        fs::write(
            dir.path().join(TSCONFIG_FILE_NAME),
            "{\n  // comment\n  \"compilerOptions\": {}\n}\n",
        )
        .expect("should write tsconfig");

        let config = Config::load(dir.path(), None).expect("should still load");
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        fs::write(dir.path().join(CONFIG_FILE_NAME), "aliases: [not, a, map]\n")
            .expect("should write config");

        let result = Config::load(dir.path(), None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn explicit_missing_config_is_io_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");

        let result = Config::load(dir.path(), Some(Path::new("missing.yaml")));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn missing_root_is_io_error() {
        let result = Config::load(Path::new("/nonexistent/ripple/root"), None);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
