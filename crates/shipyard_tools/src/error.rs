//! Error types for the tools crate.

use thiserror::Error;

/// Errors that can occur while loading content or writing a catalog.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to read or write a file or directory.
    #[error("IO error at '{path}': {source}")]
    Io {
        /// Path being accessed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The plugin root directory does not exist.
    #[error("Source directory not found: '{0}'")]
    MissingSource(String),

    /// Failed to parse a RON manifest.
    #[error("Failed to parse manifest '{path}': {source}")]
    Manifest {
        /// Path to the manifest.
        path: String,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// Failed to serialize output.
    #[error("Failed to serialize '{path}': {source}")]
    Json {
        /// Output path.
        path: String,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    /// Wrap an IO error with the path that caused it.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
