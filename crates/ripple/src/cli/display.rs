//! Common display utilities for CLI commands.

use std::env;
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use ripple::{BuildStats, FileIdentity, ImpactKind, ImpactNode};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Rendering options for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only connectors instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` with explicit values.
    #[cfg(test)]
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `RIPPLE_ASCII`: Set to "1" or "true" for ASCII-only connectors (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `RIPPLE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_ascii = match env::var("RIPPLE_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "RIPPLE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR (https://no-color.org/), RIPPLE_COLOR for explicit control
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("RIPPLE_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Force ASCII connectors on top of the environment settings.
    pub fn with_ascii(mut self, ascii: bool) -> Self {
        self.use_ascii |= ascii;
        self
    }
}

/// Path of `file` relative to the project root, for display.
pub fn display_path(file: &FileIdentity, root: &Path) -> String {
    file.relative_to(root).display().to_string()
}

fn paint(text: &str, config: &OutputConfig, style: impl FnOnce(&str) -> String) -> String {
    if config.use_colors {
        style(text)
    } else {
        text.to_string()
    }
}

fn colorize_kind(kind: ImpactKind, config: &OutputConfig) -> String {
    let text = format!("({kind})");
    paint(&text, config, |t| match kind {
        ImpactKind::Delete => t.red().bold().to_string(),
        ImpactKind::Add => t.green().bold().to_string(),
        ImpactKind::Modify => t.yellow().bold().to_string(),
        ImpactKind::Affected => t.cyan().to_string(),
    })
}

/// Render an impact tree with tree connectors.
///
/// Renders a tree like:
/// ```text
/// ◆ src/util.ts (modify)
/// ├── src/a.ts (affected) modified exports: foo
/// │   └── src/index.ts (affected) file was modified
/// └── src/b.ts (affected) modified exports: foo
/// ```
pub fn write_impact_tree<W: Write>(
    w: &mut W,
    root: &ImpactNode,
    project_root: &Path,
    config: &OutputConfig,
) -> io::Result<()> {
    let root_icon = if config.use_ascii { "*" } else { "◆" };
    let root_icon = paint(root_icon, config, |t| t.cyan().bold().to_string());
    let file = paint(&display_path(&root.file, project_root), config, |t| {
        t.white().bold().to_string()
    });

    writeln!(
        w,
        "{} {} {}",
        root_icon,
        file,
        colorize_kind(root.change_type, config)
    )?;

    write_children(w, &root.children, &[], project_root, config)
}

/// Recursively render children.
///
/// `prefix_segments` tracks which ancestor levels still have siblings below,
/// used to draw the vertical continuation lines (`│`).
fn write_children<W: Write>(
    w: &mut W,
    children: &[ImpactNode],
    prefix_segments: &[bool],
    project_root: &Path,
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;

        let mut prefix = String::new();
        for &has_more in prefix_segments {
            let segment = if has_more { pipe } else { space };
            prefix.push_str(&paint(segment, config, |t| t.dimmed().to_string()));
        }
        let connector = if is_last { corner } else { branch };
        let connector = paint(connector, config, |t| t.dimmed().to_string());

        let reason = child
            .reason
            .as_deref()
            .map(|r| format!(" {}", paint(r, config, |t| t.dimmed().to_string())))
            .unwrap_or_default();

        writeln!(
            w,
            "{}{}{} {}{}",
            prefix,
            connector,
            display_path(&child.file, project_root),
            colorize_kind(child.change_type, config),
            reason
        )?;

        if !child.children.is_empty() {
            let mut next_segments = prefix_segments.to_vec();
            next_segments.push(!is_last);
            write_children(w, &child.children, &next_segments, project_root, config)?;
        }
    }

    Ok(())
}

/// Convert an impact tree to JSON with root-relative paths.
pub fn impact_to_json(node: &ImpactNode, project_root: &Path) -> serde_json::Value {
    let mut obj = serde_json::json!({
        "file": display_path(&node.file, project_root),
        "change_type": node.change_type.as_str(),
    });
    if let Some(reason) = &node.reason {
        obj["reason"] = serde_json::json!(reason);
    }
    obj["children"] = serde_json::json!(
        node.children
            .iter()
            .map(|child| impact_to_json(child, project_root))
            .collect::<Vec<_>>()
    );
    obj
}

/// Display a list of files with optional truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` files with bullet points. If there are more,
/// shows "... and N more". If empty, shows the provided `empty_message`.
pub fn print_files(files: &[&FileIdentity], project_root: &Path, empty_message: &str) {
    if files.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for file in files.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {}", "•".dimmed(), display_path(file, project_root));
    }

    if files.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            files.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Report files that could not be inspected on stderr.
pub fn print_skipped_files(stats: &BuildStats, project_root: &Path) {
    if stats.errors.is_empty() {
        return;
    }

    eprintln!(
        "{}: {} file(s) could not be inspected and contribute no imports:",
        "warning".yellow().bold(),
        stats.errors.len()
    );
    for error in stats.errors.iter().take(MAX_DISPLAY_ITEMS) {
        let path = error
            .path
            .strip_prefix(project_root)
            .unwrap_or(&error.path);
        eprintln!(
            "    {} {}: {}",
            "•".dimmed(),
            path.display(),
            error.message.dimmed()
        );
    }
    if stats.errors.len() > MAX_DISPLAY_ITEMS {
        eprintln!(
            "    {} ... and {} more",
            "•".dimmed(),
            stats.errors.len() - MAX_DISPLAY_ITEMS
        );
    }
}
