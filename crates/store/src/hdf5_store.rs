//! Store backed by an HDF5 file (DREAM3D, MICRESS, ...)

// standard library
use std::path::Path;

// crate modules
use crate::array::{Array, ArrayData};
use crate::error::{Error, Result};
use crate::resolve::{normalise_path, Node, Resolve};

// mictools modules
use mictools_format::f;

// external crates
use hdf5::types::TypeDescriptor;
use log::info;

/// A read-only hierarchical store backed by an HDF5 file
///
/// The file handle is closed when the store is dropped.
#[derive(Debug)]
pub struct Hdf5Store {
    file: hdf5::File,
}

impl Hdf5Store {
    /// Open the HDF5 file at `path` read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading {path:?}");
        Ok(Self {
            file: hdf5::File::open(path)?,
        })
    }
}

impl Resolve for Hdf5Store {
    fn node(&self, path: &str) -> Result<Node> {
        let path = normalise_path(path);

        if path != "/" && !self.file.link_exists(&path) {
            return Err(Error::PathNotFound { path });
        }

        if let Ok(group) = self.file.group(&path) {
            let mut names = group.member_names()?;
            names.sort();
            return Ok(Node::Group(names));
        }

        let dataset = self.file.dataset(&path)?;
        let shape = dataset.shape();
        let data = match dataset.dtype()?.to_descriptor()? {
            TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
                ArrayData::Int(dataset.read_raw::<i64>()?)
            }
            // stored as an enum, so there is no conversion straight to i64
            TypeDescriptor::Boolean => ArrayData::Int(
                dataset
                    .read_raw::<bool>()?
                    .into_iter()
                    .map(i64::from)
                    .collect(),
            ),
            TypeDescriptor::Float(_) => ArrayData::Float(dataset.read_raw::<f64>()?),
            other => {
                return Err(Error::TypeMismatch {
                    path,
                    expected: "numeric array".to_string(),
                    found: f!("{other:?}"),
                })
            }
        };

        Array::new(shape, data)
    }
}
