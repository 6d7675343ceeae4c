//! Error types for configuration, structural failures and per-item tree mutations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),

    /// Invalid regex pattern provided with the actual error reason.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },

    /// A rule or subdirectory mapping names a category that does not exist.
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Failures that end a run with a non-zero status. All but
/// `ReportSerialization` are detected before any mutation.
#[derive(Debug, Error)]
pub enum ReorgError {
    /// Neither the legacy nor the decorated container directory exists.
    #[error("Container directory not found: neither {} nor {} exists", .legacy.display(), .decorated.display())]
    ContainerMissing { legacy: PathBuf, decorated: PathBuf },

    /// The source root exists but cannot be enumerated.
    #[error("Error reading directory {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),

    /// The finished report could not be rendered as JSON.
    #[error("Error serializing report: {0}")]
    ReportSerialization(#[from] serde_json::Error),
}

impl ReorgError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ContainerMissing { .. } => 2,
            Self::SourceUnreadable { .. } => 3,
            Self::Config(_) => 4,
            Self::ReportSerialization(_) => 1,
        }
    }
}

/// Errors that can occur while mutating the tree. Each one is recorded
/// against the item it happened to and never stops the run.
#[derive(Debug, Error)]
pub enum MutateError {
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a document to its category directory.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to rename a directory.
    #[error("Failed to rename {} to {}: {source}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a directory during pruning.
    #[error("Failed to remove {}: {source}", .path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source path has no file name component.
    #[error("{} has no file name component", .0.display())]
    MissingFileName(PathBuf),

    /// The file name is not valid UTF-8 and cannot be carried over unchanged.
    #[error("{} has a file name that is not valid UTF-8", .0.display())]
    NonUtf8FileName(PathBuf),
}

impl MutateError {
    /// The path the failure is reported against.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::DirectoryCreationFailed { path, .. } | Self::RemoveFailed { path, .. } => path,
            Self::FileMoveFailure { from, .. } | Self::RenameFailed { from, .. } => from,
            Self::MissingFileName(path) | Self::NonUtf8FileName(path) => path,
        }
    }
}

/// Result type for tree mutations.
pub type MutateResult<T> = Result<T, MutateError>;
