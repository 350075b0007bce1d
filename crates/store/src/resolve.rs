//! The path resolver interface shared by every store

// standard library
use std::path::Path;

// crate modules
use crate::array::Array;
use crate::error::{Error, Result};
use crate::json::JsonStore;

// mictools modules
use mictools_format::f;

// external crates
use log::debug;

/// Anything that can live at a logical path
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A numeric dataset
    Dataset(Array),
    /// A group, with the names of its direct children in sorted order
    Group(Vec<String>),
}

/// Resolve logical paths to numeric arrays
///
/// The extractors only ever talk to a store through this trait, so any backing
/// format that can answer "path to typed array, or not found" is usable.
/// Implementors provide [Resolve::node] and get the rest for free.
///
/// Logical paths are split by [split_path].
///
/// ```rust
/// # use mictools_store::{Array, MemoryStore, Resolve};
/// let mut store = MemoryStore::new();
/// store.insert("/Grid/FeatureIds", Array::from_ints(vec![1, 1, 2, 2])).unwrap();
///
/// // slash and dot separated paths are equivalent
/// let a = store.resolve("/Grid/FeatureIds").unwrap();
/// let b = store.resolve("Grid.FeatureIds").unwrap();
/// assert_eq!(a, b);
///
/// // groups are not arrays
/// assert!(store.resolve("/Grid").is_err());
/// ```
pub trait Resolve {
    /// Look up whatever lives at `path`
    ///
    /// Fails with [Error::PathNotFound] if nothing does.
    fn node(&self, path: &str) -> Result<Node>;

    /// Look up the numeric array at `path`
    ///
    /// Fails with [Error::PathNotFound] if the location does not exist, and
    /// [Error::TypeMismatch] if it is not a numeric array.
    fn resolve(&self, path: &str) -> Result<Array> {
        match self.node(path)? {
            Node::Dataset(array) => {
                debug!("Resolved \"{path}\" to {}", array.describe());
                Ok(array)
            }
            Node::Group(_) => Err(Error::TypeMismatch {
                path: path.to_string(),
                expected: "numeric array".to_string(),
                found: "group".to_string(),
            }),
        }
    }

    /// Look up a single value at `path`
    ///
    /// Any array with exactly one element counts, whatever its shape.
    fn scalar(&self, path: &str) -> Result<f64> {
        let array = self.resolve(path)?;
        match array.to_f64_vec().as_slice() {
            [value] => Ok(*value),
            _ => Err(Error::TypeMismatch {
                path: path.to_string(),
                expected: "scalar".to_string(),
                found: array.describe(),
            }),
        }
    }

    /// Check if anything exists at `path`
    fn exists(&self, path: &str) -> bool {
        self.node(path).is_ok()
    }
}

impl<T: Resolve + ?Sized> Resolve for &T {
    fn node(&self, path: &str) -> Result<Node> {
        (**self).node(path)
    }
}

impl<T: Resolve + ?Sized> Resolve for Box<T> {
    fn node(&self, path: &str) -> Result<Node> {
        (**self).node(path)
    }
}

/// Split a logical path into its components
///
/// Paths containing a `/` are split on `/`, anything else is split on `.` so
/// that dotted paths such as `DataContainers.Grid.FeatureIds` also work.
/// Empty components are dropped, so the root is `""` or `"/"`.
///
/// ```rust
/// # use mictools_store::split_path;
/// assert_eq!(split_path("/a/b//c/"), vec!["a", "b", "c"]);
/// assert_eq!(split_path("a.b.c"), vec!["a", "b", "c"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    let separator = if path.contains('/') { '/' } else { '.' };
    path.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalise any logical path to the absolute slash-separated form
///
/// ```rust
/// # use mictools_store::normalise_path;
/// assert_eq!(normalise_path("a.b.c"), "/a/b/c");
/// assert_eq!(normalise_path(""), "/");
/// ```
pub fn normalise_path(path: &str) -> String {
    f!("/{}", split_path(path).join("/"))
}

/// Open a store for the input file at `path`
///
/// JSON documents (`.json`) are always supported. Everything else is treated
/// as HDF5 (`.h5`, `.hdf5`, `.dream3d`, ...), which requires the `hdf5`
/// feature.
pub fn open_store<P: AsRef<Path>>(path: P) -> Result<Box<dyn Resolve>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    debug!("Opening store {path:?}");
    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonStore::open(path)?)),
        _ => open_hdf5(path),
    }
}

#[cfg(feature = "hdf5")]
fn open_hdf5(path: &Path) -> Result<Box<dyn Resolve>> {
    Ok(Box::new(crate::hdf5_store::Hdf5Store::open(path)?))
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5(path: &Path) -> Result<Box<dyn Resolve>> {
    Err(Error::UnsupportedFormat(path.to_path_buf()))
}
