//! Error types for doc-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from doc-blocks
    #[error(transparent)]
    Core(#[from] doc_blocks::Error),

    #[error(transparent)]
    Version(#[from] doc_blocks::VersionError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Template file could not be parsed
    #[error("Failed to parse {format} template {}: {message}", .path.display())]
    Config {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// Stored block metadata could not be parsed
    #[error("Failed to read block metadata {}: {message}", .path.display())]
    Metadata { path: PathBuf, message: String },

    #[error("Unsupported template format: '{extension}' (expected toml, json, yaml or yml)")]
    UnsupportedFormat { extension: String },

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
