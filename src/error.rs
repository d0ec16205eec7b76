//! Error types for flatform library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flatform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while placing fields.
///
/// Only unrecoverable conditions live here. A missing anchor, an
/// unrecognized page or a degenerate rectangle is expected variation and
/// never surfaces as an error; the affected field is simply not emitted.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not exist.
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The layout file could not be understood.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error while materializing placements.
    #[error("Materialization error: {0}")]
    Materialize(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => {
                Error::Io(io::Error::new(io::ErrorKind::Other, err.to_string()))
            }
            _ => Error::InvalidLayout(err.to_string()),
        }
    }
}
