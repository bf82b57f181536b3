//! Error types for `srcsync-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// What kind of entry an operation required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    File,
    Directory,
}

impl std::fmt::Display for ExpectedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedKind::File => f.write_str("file"),
            ExpectedKind::Directory => f.write_str("directory"),
        }
    }
}

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or take corrective action.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The user dismissed the selection dialog.
    #[error("selection cancelled")]
    UserCancelled,

    /// Read access was refused, by the user or by the operating system.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was selected where a file was required, or vice versa.
    #[error("expected a {expected}: {path}")]
    WrongEntryKind { path: PathBuf, expected: ExpectedKind },

    /// No direct child of the directory matched the suffix filter.
    #[error("no files matching `{suffix}` in {dir}")]
    NoMatchingFiles { dir: PathBuf, suffix: String },

    /// A listing, metadata or content fetch failed.
    #[error("failed to read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Wraps an I/O error raised while reading `path`.
    pub(crate) fn read_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::ReadFailure {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors the caller should treat as a no-op.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::UserCancelled)
    }
}

/// Convenience alias used throughout `srcsync-core`.
pub type CoreResult<T> = Result<T, CoreError>;
