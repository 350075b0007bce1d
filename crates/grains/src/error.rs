//! Result and Error types for mictools-grains

// standard library
use std::path::PathBuf;

/// Type alias for `Result<T, grains::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `mictools-grains` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to look up an input array
    #[error("failed to resolve input array")]
    StoreError(#[from] mictools_store::Error),

    /// Underlying file I/O error while reading
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    /// The destination could not be created or written
    #[error("failed to write {path:?}")]
    IOWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Per-grain arrays disagree with each other or the expected layout
    #[error("{0}")]
    ShapeMismatch(String),

    /// An array holds the wrong kind of values
    #[error("unexpected values at \"{path}\" (expected {expected}, found {found})")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A grain table could not be parsed
    #[error("parser failed: {0}")]
    ParseError(String),
}
