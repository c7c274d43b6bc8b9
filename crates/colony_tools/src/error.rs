//! Tool error types.

use std::path::PathBuf;

use colony_core::error::EconomyError;
use thiserror::Error;

/// Errors raised by the development tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A data file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Data failed to parse or is inconsistent.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// Report could not be encoded.
    #[error("Failed to encode report: {0}")]
    Encode(String),

    /// Cross-file checks found problems.
    #[error("{} validation problem(s):\n  {}", .0.len(), .0.join("\n  "))]
    Invalid(Vec<String>),
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
