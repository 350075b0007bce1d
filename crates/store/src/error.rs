//! Result and Error types for mictools-store

// standard library
use std::path::PathBuf;

/// Type alias for `Result<T, store::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `mictools-store` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to deserialise a JSON document
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// Failure in the underlying HDF5 library
    #[cfg(feature = "hdf5")]
    #[error("hdf5 error")]
    Hdf5Error(#[from] hdf5::Error),

    /// Nothing exists at the logical path
    #[error("no dataset or group found at \"{path}\"")]
    PathNotFound { path: String },

    /// Something exists at the logical path, but not what was expected
    #[error("unexpected object at \"{path}\" (expected {expected}, found {found})")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// Flat data does not fill the declared shape
    #[error("data of length {length} does not fit shape {shape:?}")]
    InvalidShape { shape: Vec<usize>, length: usize },

    /// A dataset would be inserted below another dataset
    #[error("\"{path}\" passes through an existing dataset")]
    PathConflict { path: String },

    /// No store implementation for the file type
    #[error("unsupported input file {0:?}")]
    UnsupportedFormat(PathBuf),
}
