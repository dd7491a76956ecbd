//! Tool error types.

use std::path::PathBuf;

use arena_core::error::ArenaError;
use thiserror::Error;

/// Errors raised by the development tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A file or directory could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Arena construction or reconciliation failed.
    #[error(transparent)]
    Arena(#[from] ArenaError),

    /// A settings file failed validation.
    #[error("{path}: {source}")]
    InvalidSettings {
        /// Offending file.
        path: PathBuf,
        /// Why it was rejected.
        #[source]
        source: ArenaError,
    },

    /// A snapshot could not be serialized.
    #[error("Snapshot serialization failed: {0}")]
    Snapshot(String),
}

impl ToolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
