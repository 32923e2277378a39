//! Error types for board operations, storage and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board mutations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Reasons a board mutation is rejected.
///
/// The `Display` text is what gets shown to the user as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A required field was empty
    #[error("Please fill all the fields ({field} is required)")]
    ValidationFailed { field: &'static str },

    /// Another column already uses this title
    #[error("Column with the same title already exists: {title}")]
    DuplicateTitle { title: String },

    /// The board must keep at least one column
    #[error("At least 1 column is required.")]
    LastColumnRemaining,

    /// A column or task id no longer resolves
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
}

impl BoardError {
    pub fn column_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            what: "column",
            id: id.to_string(),
        }
    }

    pub fn task_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            what: "task",
            id: id.to_string(),
        }
    }
}

/// Errors from the key-value store backing the board
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors while reading or writing `kanban_config.json`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
