//! Error types for snapshot persistence.

use std::path::PathBuf;

/// Error writing or reading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document is not a JSON object.
    #[error("{}: document must be a JSON object, got {kind}", path.display())]
    NotAnObject {
        /// Target or source file.
        path: PathBuf,
        /// JSON type that was found instead.
        kind: &'static str,
    },

    /// Filesystem operation failed (permissions, disk full, bad path).
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory being written or read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Document could not be serialized or a file could not be parsed.
    #[error("{}: invalid JSON: {source}", path.display())]
    Json {
        /// File being written or read.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
