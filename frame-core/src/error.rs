//! Error types for frame operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors that can occur while editing, loading or saving a frame project.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Image file exists but could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// A file path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Color string is not `#` followed by six hex digits.
    #[error("Invalid color: {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    /// Project or template document is corrupt or unparseable.
    #[error("Invalid document format: {0}")]
    Format(String),

    /// Filesystem failure while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A resource referenced by a persisted record is absent on disk.
    #[error("Missing resource: {}", .0.display())]
    MissingResource(PathBuf),

    /// The requested command is not allowed in the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(err.to_string())
    }
}

impl FrameError {
    /// Map an IO error on `path` to [`FrameError::NotFound`] when the file is
    /// absent, keeping every other kind as [`FrameError::Io`].
    #[must_use]
    pub fn from_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.into())
        } else {
            Self::Io(err)
        }
    }
}
