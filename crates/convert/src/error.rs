//! Result and Error types for mictools-convert

// crate modules
use crate::report::ErrorKind;

/// Type alias for `Result<T, convert::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `mictools-convert` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The input could not be opened or a path could not be resolved
    #[error("failed to read the input")]
    StoreError(#[from] mictools_store::Error),

    /// Extracting or writing the grain table failed
    #[error("failed to convert the grain table")]
    GrainsError(#[from] mictools_grains::Error),

    /// Extracting or writing the voxel grid failed
    #[error("failed to convert the voxel grid")]
    VoxelsError(#[from] mictools_voxels::Error),

    /// Underlying file I/O error
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    /// The configuration file is not valid JSON for a [ConversionConfig](crate::ConversionConfig)
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// Configuration is missing something a requested output needs
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// The driving file template could not be used
    #[error("driving file template: {0}")]
    TemplateError(String),
}

impl Error {
    /// Category of the failure for reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StoreError(e) => store_kind(e),
            Self::GrainsError(e) => grains_kind(e),
            Self::VoxelsError(e) => voxels_kind(e),
            Self::IOError(_) => ErrorKind::Io,
            Self::JSONError(_) | Self::ConfigError(_) => ErrorKind::Config,
            Self::TemplateError(_) => ErrorKind::Template,
        }
    }

    /// Every message in the chain of sources, joined by `": "`
    pub fn chain(&self) -> String {
        let mut messages = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(e) = source {
            messages.push(e.to_string());
            source = std::error::Error::source(e);
        }
        messages.join(": ")
    }
}

fn store_kind(error: &mictools_store::Error) -> ErrorKind {
    use mictools_store::Error as E;
    match error {
        E::PathNotFound { .. } => ErrorKind::PathNotFound,
        E::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        E::InvalidShape { .. } => ErrorKind::ShapeMismatch,
        E::UnsupportedFormat(_) | E::PathConflict { .. } => ErrorKind::Config,
        _ => ErrorKind::Io,
    }
}

fn grains_kind(error: &mictools_grains::Error) -> ErrorKind {
    use mictools_grains::Error as E;
    match error {
        E::StoreError(e) => store_kind(e),
        E::IOWriteError { .. } => ErrorKind::IoWrite,
        E::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
        E::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        E::IOError(_) | E::ParseError(_) => ErrorKind::Io,
    }
}

fn voxels_kind(error: &mictools_voxels::Error) -> ErrorKind {
    use mictools_voxels::Error as E;
    match error {
        E::StoreError(e) => store_kind(e),
        E::IOWriteError { .. } | E::VtkioError(_) => ErrorKind::IoWrite,
        E::ShapeMismatch { .. } | E::SnapshotMismatch { .. } | E::CellDataMismatch { .. } => {
            ErrorKind::ShapeMismatch
        }
        E::Dimensionality(_) => ErrorKind::Dimensionality,
        E::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        E::InvalidOptions(_) => ErrorKind::Config,
        E::IOError(_) => ErrorKind::Io,
    }
}
