//! Error types for ripple operations.
//!
//! Errors fall into two groups:
//!
//! - **`Error`**: top-level failures that end a run (missing inputs, bad configuration)
//! - **`InspectError`**: file-level failures that are collected while the graph is built
//!
//! ## Error Philosophy
//!
//! Graph construction is best effort:
//! - One unreadable or malformed file drops only that file's edges and exports
//! - File-level errors are logged and reported in `BuildStats`, never thrown
//! - Only boundary problems (missing inputs, unusable configuration) stop a run
//!
//! ## Error Categorization
//!
//! `InspectErrorKind` uses a 4xx/5xx style categorization:
//! - Input problems (the project's fault): syntax errors, unsupported file types
//! - Internal problems (the environment's fault): unreadable files

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ripple operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for ripple operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree-sitter parsing infrastructure failed (grammar could not be loaded)
    #[error("parser error: {0}")]
    Parser(String),

    /// Invalid configuration file or alias flag
    #[error("configuration error: {0}")]
    Config(String),

    /// A required input was not supplied
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// The entry file does not exist or is not a regular file
    #[error("entry file not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    /// The change kind is not one of `add`, `modify` or `delete`
    #[error("invalid change kind: {0} (expected add, modify or delete)")]
    InvalidChangeKind(String),
}

/// Failure to inspect a single source file.
///
/// These are collected during graph construction and never halt it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectError {
    /// Path to the file that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: InspectErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for InspectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for InspectError {}

/// Categorization of inspection errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectErrorKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// Source file has syntax errors
    ParseFailed,

    /// File type is not one the inspector understands
    UnsupportedLanguage,

    /// File content is not valid UTF-8
    EncodingError,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// Could not read the file from disk
    ReadFailed,
}

impl std::fmt::Display for InspectErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::UnsupportedLanguage => write!(f, "unsupported language"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::ReadFailed => write!(f, "read failed"),
        }
    }
}

impl InspectErrorKind {
    /// Returns `true` if this is an input problem (4xx-style).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ParseFailed | Self::UnsupportedLanguage | Self::EncodingError
        )
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::ReadFailed)
    }
}

impl InspectError {
    /// Create a new inspection error.
    #[must_use]
    pub fn new(path: PathBuf, kind: InspectErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn parse_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, InspectErrorKind::ParseFailed, message)
    }

    /// Create an unsupported language error.
    #[must_use]
    pub fn unsupported_language(path: PathBuf) -> Self {
        let ext = path
            .extension()
            .map_or_else(|| "none".to_string(), |e| e.to_string_lossy().to_string());
        Self::new(
            path,
            InspectErrorKind::UnsupportedLanguage,
            format!("unsupported extension: {ext}"),
        )
    }

    /// Create an encoding error for a file.
    #[must_use]
    pub fn encoding_error(path: PathBuf) -> Self {
        Self::new(
            path,
            InspectErrorKind::EncodingError,
            "file is not valid UTF-8",
        )
    }

    /// Create a read error for a file.
    #[must_use]
    pub fn read_failed(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, InspectErrorKind::ReadFailed, error.to_string())
    }
}
