//! Error types for noty.

use std::path::PathBuf;

use thiserror::Error;

use crate::note::NoteId;

/// Top-level result type for noty operations.
pub type Result<T> = std::result::Result<T, NotyError>;

/// Top-level error type for noty.
#[derive(Debug, Error)]
pub enum NotyError {
    #[error("subject '{0}' is already used by another note")]
    DuplicateSubject(String),

    #[error("note {0} does not exist")]
    NoteNotFound(NoteId),

    #[error("subject '{0}' is not registered")]
    SubjectNotFound(String),

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("id conflict: expected to commit id {expected}, settings assigned {actual}")]
    Conflict { expected: NoteId, actual: NoteId },

    #[error("invalid search pattern: {0}")]
    Pattern(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl NotyError {
    /// True for every variant that means "the thing you asked for does not resolve".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoteNotFound(_) | Self::SubjectNotFound(_) | Self::MissingFile(_)
        )
    }

    /// Map an I/O error on `path` to [`NotyError::MissingFile`] when the
    /// file is absent, and to [`NotyError::Io`] otherwise.
    #[must_use]
    pub fn from_io_at(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile(path.into())
        } else {
            Self::Io(err)
        }
    }
}

impl From<serde_json::Error> for NotyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
