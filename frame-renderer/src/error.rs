//! Renderer error types.

use std::path::PathBuf;

use frame_core::FrameError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while compositing or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Model-level failure (missing template, invalid project name, ...).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Encoding a surface failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Writing an artifact failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Attach the artifact path to an I/O error.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
