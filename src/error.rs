//! Conversion error kinds.
//!
//! A missing creation date is not an error; it surfaces as `None` and the
//! output keeps its default name.

use std::path::PathBuf;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors raised while converting a path.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input path does not exist.
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The input exists but is neither a file nor a directory.
    #[error("input is neither a file nor a directory: {}", path.display())]
    UnsupportedInput { path: PathBuf },

    /// The transcoding engine rejected the file.
    #[error("unsupported media {}: {source}", path.display())]
    UnsupportedMedia {
        path: PathBuf,
        #[source]
        source: prores_av::Error,
    },

    /// The destination name is taken and the collision policy is `fail`.
    #[error("destination already exists: {}", path.display())]
    RenameCollision { path: PathBuf },

    /// Media tooling error outside of a specific file's transcode.
    #[error(transparent)]
    Av(#[from] prores_av::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Create an input not found error.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Wrap an engine error for a specific file.
    pub fn unsupported_media(path: impl Into<PathBuf>, source: prores_av::Error) -> Self {
        Self::UnsupportedMedia {
            path: path.into(),
            source,
        }
    }

    /// Create a rename collision error.
    pub fn rename_collision(path: impl Into<PathBuf>) -> Self {
        Self::RenameCollision { path: path.into() }
    }
}
