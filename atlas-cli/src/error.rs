//! CLI error types.

use std::path::PathBuf;

use atlas_core::AtlasError;
use thiserror::Error;

/// Errors from loading inputs or running commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file held malformed JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The engine rejected an input.
    #[error(transparent)]
    Atlas(#[from] AtlasError),

    /// A command needs an input that was not given.
    #[error("Missing input: {0}")]
    MissingInput(&'static str),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
