//! Error types for fakepoint discovery and watching.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for fakepoint operations.
pub type Result<T> = std::result::Result<T, FakepointError>;

/// Errors that can occur in the fakepoints plugin.
#[derive(Error, Debug)]
pub enum FakepointError {
    /// Invalid plugin options. Raised when the plugin is constructed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The host failed to restart after a fakepoint was added or deleted.
    #[error("restart failed ({reason}): {source:#}")]
    Restart {
        reason: crate::watch::RestartReason,
        source: anyhow::Error,
    },

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A directory that could not be read during a scan.
///
/// Never fatal: the scanner logs it, records it and moves on.
#[derive(Error, Debug)]
#[error("cannot read {}: {message}", path.display())]
pub struct ScanError {
    /// The directory (or entry) that failed.
    pub path: PathBuf,

    /// What went wrong.
    pub message: String,
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        Self {
            path: err.path().map(PathBuf::from).unwrap_or_default(),
            message: err
                .io_error()
                .map(ToString::to_string)
                .unwrap_or_else(|| err.to_string()),
        }
    }
}
