//! Result and Error types for mictools-voxels

// standard library
use std::path::PathBuf;

/// Type alias for `Result<T, voxels::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `mictools-voxels` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to look up an input array
    #[error("failed to resolve input array")]
    StoreError(#[from] mictools_store::Error),

    /// Underlying file I/O error
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    /// The destination could not be created or written
    #[error("failed to write {path:?}")]
    IOWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export through `vtkio` failed
    #[error("vtkio error")]
    VtkioError(#[from] vtkio::Error),

    /// The grain-id array does not fill the grid
    #[error("grain id array has {found} values but the grid has {expected} cells")]
    ShapeMismatch { expected: usize, found: usize },

    /// One snapshot of a time series does not fill the grid
    #[error("snapshot {index} has {found} values but the grid has {expected} cells")]
    SnapshotMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// An extra cell array does not fill the grid
    #[error("cell data \"{name}\" has {found} values but the grid needs {expected}")]
    CellDataMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Grid dimensions are non-positive or inconsistent
    #[error("invalid grid dimensions: {0}")]
    Dimensionality(String),

    /// An array holds the wrong kind of values
    #[error("unexpected values at \"{path}\" (expected {expected}, found {found})")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// Writer options are unusable
    #[error("invalid vtk options: {0}")]
    InvalidOptions(String),
}
