//! Building voxel grids from per-cell arrays

// standard library
use std::cmp::Ordering;

// crate modules
use crate::cell_data::{CellArray, CellDataSpec};
use crate::error::{Error, Result};
use crate::grid::{Dimensionality, VoxelGrid};

// mictools modules
use mictools_format::f;
use mictools_store::{normalise_path, Array, Node, Resolve};

// external crates
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// A grid property given either directly or as a path into the input store
///
/// In JSON this is either the value itself or a path string.
///
/// ```rust
/// # use mictools_voxels::GridValue;
/// let inline: GridValue<Vec<i64>> = serde_json::from_str("[64, 64, 1]").unwrap();
/// assert_eq!(inline, GridValue::Values(vec![64, 64, 1]));
///
/// let path: GridValue<Vec<i64>> = serde_json::from_str("\"/Geometry/DIMENSIONS\"").unwrap();
/// assert_eq!(path, GridValue::Path("/Geometry/DIMENSIONS".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridValue<T> {
    /// The values themselves
    Values(T),
    /// Logical path of a dataset holding the values
    Path(String),
}

impl<T> From<T> for GridValue<T> {
    fn from(values: T) -> Self {
        Self::Values(values)
    }
}

impl GridValue<Vec<i64>> {
    fn load<R: Resolve + ?Sized>(&self, store: &R) -> Result<Vec<i64>> {
        match self {
            Self::Values(values) => Ok(values.clone()),
            Self::Path(path) => integers(&store.resolve(path)?, path),
        }
    }
}

impl GridValue<Vec<f64>> {
    fn load<R: Resolve + ?Sized>(&self, store: &R) -> Result<Vec<f64>> {
        match self {
            Self::Values(values) => Ok(values.clone()),
            Self::Path(path) => Ok(store.resolve(path)?.to_f64_vec()),
        }
    }
}

impl GridValue<f64> {
    fn load<R: Resolve + ?Sized>(&self, store: &R) -> Result<f64> {
        match self {
            Self::Values(value) => Ok(*value),
            Self::Path(path) => Ok(store.scalar(path)?),
        }
    }
}

/// Extract a voxel grid of grain ids, optionally with a time series
///
/// The [Dimensionality] decides how the grid properties are read. In 2D only
/// the first two values of the dimensions and spacing matter, `nz` is always 1
/// and the z spacing is set equal to x.
///
/// ```rust
/// # use mictools_voxels::{Dimensionality, GridValue, VoxelGridExtractor};
/// # use mictools_store::{Array, MemoryStore};
/// let store = MemoryStore::new()
///     .with("/CellData/FeatureIds", Array::from_ints(vec![1, 1, 2, 2])).unwrap();
///
/// let grid = VoxelGridExtractor::new(Dimensionality::Two)
///     .extract(
///         &store,
///         "/CellData/FeatureIds",
///         &GridValue::Values(vec![2, 2]),
///         &GridValue::Values(vec![0.5, 0.5]),
///         None,
///     )
///     .unwrap();
///
/// assert_eq!(grid.dimensions, [2, 2, 1]);
/// assert_eq!(grid.spacing, [0.5, 0.5, 0.5]);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VoxelGridExtractor {
    /// 2D or 3D structure
    pub dimensionality: Dimensionality,
    /// Grid corner, zeros if not set
    pub origin: Option<GridValue<Vec<f64>>>,
    /// Simulation time written to the VTK title
    pub time: Option<GridValue<f64>>,
    /// Extra per-cell arrays to read alongside the grain ids
    pub cell_data: Vec<CellDataSpec>,
}

impl VoxelGridExtractor {
    /// New extractor for the given dimensionality
    pub fn new(dimensionality: Dimensionality) -> Self {
        Self {
            dimensionality,
            ..Default::default()
        }
    }

    /// Set the grid corner
    pub fn origin(mut self, origin: Option<GridValue<Vec<f64>>>) -> Self {
        self.origin = origin;
        self
    }

    /// Set the simulation time
    pub fn time(mut self, time: Option<GridValue<f64>>) -> Self {
        self.time = time;
        self
    }

    /// Set the extra per-cell arrays
    pub fn cell_data(mut self, cell_data: Vec<CellDataSpec>) -> Self {
        self.cell_data = cell_data;
        self
    }

    /// Resolve the grain ids and grid properties and build the grid
    ///
    /// With a `time_path`, every snapshot is read and validated before the grid
    /// is returned, so an invalid series never produces any output. The whole
    /// series stays in memory until the grid is dropped.
    ///
    /// Extra cell arrays are resolved in the order configured and must each
    /// fill the grid.
    pub fn extract<R: Resolve + ?Sized>(
        &self,
        store: &R,
        grid_id_path: &str,
        dims: &GridValue<Vec<i64>>,
        spacing: &GridValue<Vec<f64>>,
        time_path: Option<&str>,
    ) -> Result<VoxelGrid> {
        let dimensions = self.dimensions(&dims.load(store)?)?;
        let spacing = self.spacing(&spacing.load(store)?)?;
        let origin = match &self.origin {
            Some(origin) => self.origin_values(&origin.load(store)?)?,
            None => [0.0; 3],
        };

        let array = store.resolve(grid_id_path)?;
        check_storage_shape(&array, &dimensions);
        let grid = VoxelGrid::new(dimensions, spacing, integers(&array, grid_id_path)?)?
            .with_origin(origin)
            .with_time(self.load_time(store));

        if !grid.is_cubic() {
            warn!(
                "Non-cubic cells {:?}, MICRESS only supports cubic cells",
                grid.spacing
            );
        }

        let grid = match time_path {
            Some(path) => grid.with_timesteps(read_snapshots(store, path)?)?,
            None => grid,
        };

        let n_cells = grid.n_cells();
        let arrays = self
            .cell_data
            .iter()
            .map(|spec| spec.load(store, n_cells))
            .collect::<Result<Vec<CellArray>>>()?;
        let grid = grid.with_cell_data(arrays)?;

        info!(
            "Extracted {}x{}x{} voxel grid with {} snapshots",
            grid.dimensions[0],
            grid.dimensions[1],
            grid.dimensions[2],
            grid.timesteps.len()
        );
        Ok(grid)
    }

    /// Cell counts per axis, with `nz = 1` for 2D
    fn dimensions(&self, values: &[i64]) -> Result<[usize; 3]> {
        let [nx, ny, nz] = self.axes(values, "dimensions", 1)?;

        if let Some(n) = [nx, ny, nz].iter().find(|n| **n <= 0) {
            return Err(Error::Dimensionality(f!(
                "dimensions must be positive, found {n} in {values:?}"
            )));
        }

        if self.dimensionality == Dimensionality::Two && nz != 1 {
            warn!("Ignoring nz = {nz} for a 2D structure");
        }

        let nz = match self.dimensionality {
            Dimensionality::Two => 1,
            Dimensionality::Three => nz,
        };
        Ok([nx as usize, ny as usize, nz as usize])
    }

    /// Cell sizes per axis, with the x spacing reused for z in 2D
    fn spacing(&self, values: &[f64]) -> Result<[f64; 3]> {
        let [dx, dy, dz] = self.axes(values, "spacing", 0.0)?;
        Ok(match self.dimensionality {
            Dimensionality::Two => [dx, dy, dx],
            Dimensionality::Three => [dx, dy, dz],
        })
    }

    /// Grid corner, with z at zero in 2D
    fn origin_values(&self, values: &[f64]) -> Result<[f64; 3]> {
        let [x, y, z] = self.axes(values, "origin", 0.0)?;
        Ok(match self.dimensionality {
            Dimensionality::Two => [x, y, 0.0],
            Dimensionality::Three => [x, y, z],
        })
    }

    /// Three values from a list of two or three (2D) or exactly three (3D)
    fn axes<T: Copy + std::fmt::Debug>(&self, values: &[T], name: &str, fill: T) -> Result<[T; 3]> {
        match (self.dimensionality, values) {
            (Dimensionality::Two, [a, b]) => Ok([*a, *b, fill]),
            (_, [a, b, c]) => Ok([*a, *b, *c]),
            _ => Err(Error::Dimensionality(f!(
                "expected {} values for {name} of a {}D structure, found {values:?}",
                match self.dimensionality {
                    Dimensionality::Two => "2 or 3",
                    Dimensionality::Three => "3",
                },
                self.dimensionality.axes()
            ))),
        }
    }

    /// The time is optional, so a failed lookup is only a warning
    fn load_time<R: Resolve + ?Sized>(&self, store: &R) -> Option<f64> {
        let time = self.time.as_ref()?;
        match time.load(store) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Could not read the simulation time ({e}), writing \"t=? s\"");
                None
            }
        }
    }
}

/// Integer values of an array, accepting whole-number floats
fn integers(array: &Array, path: &str) -> Result<Vec<i64>> {
    array.to_i64_vec().ok_or_else(|| Error::TypeMismatch {
        path: path.to_string(),
        expected: "integer values".to_string(),
        found: array.describe(),
    })
}

/// Warn if a multi-dimensional array is not stored as `(nz, ny, nx[, 1])`
fn check_storage_shape(array: &Array, dimensions: &[usize; 3]) {
    let mut shape = array.shape().to_vec();
    if shape.len() == 4 && shape[3] == 1 {
        shape.pop();
    }
    if shape.len() == 3 {
        let [nx, ny, nz] = *dimensions;
        if shape != [nz, ny, nx] {
            warn!(
                "Grain id array shape {:?} does not match (nz, ny, nx) = ({nz}, {ny}, {nx}), values are taken in storage order",
                array.shape()
            );
        }
    }
}

/// Read every snapshot of a time series
///
/// A group holds one dataset per snapshot, in natural name order
/// (`t2` before `t10`). A dataset holds one snapshot per index of its
/// leading axis.
fn read_snapshots<R: Resolve + ?Sized>(store: &R, path: &str) -> Result<Vec<Vec<i64>>> {
    let snapshots = match store.node(path)? {
        Node::Group(mut children) => {
            children.sort_by(|a, b| natural_cmp(a, b));
            let parent = normalise_path(path);
            children
                .iter()
                .map(|child| {
                    let child_path = f!("{}/{child}", parent.trim_end_matches('/'));
                    integers(&store.resolve(&child_path)?, &child_path)
                })
                .collect::<Result<Vec<Vec<i64>>>>()?
        }
        Node::Dataset(array) if array.ndim() >= 2 => array
            .split_leading()
            .iter()
            .map(|snapshot| integers(snapshot, path))
            .collect::<Result<Vec<Vec<i64>>>>()?,
        Node::Dataset(array) => {
            return Err(Error::TypeMismatch {
                path: path.to_string(),
                expected: "group of snapshots or array with a leading snapshot axis".to_string(),
                found: array.describe(),
            })
        }
    };

    debug!("Read {} snapshots from \"{path}\"", snapshots.len());
    Ok(snapshots)
}

/// Compare names with embedded numbers by value
fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Number(u64),
    Text(String),
}

fn natural_key(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut rest = name;
    while let Some(first) = rest.chars().next() {
        let is_digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        chunks.push(match chunk.parse::<u64>() {
            Ok(n) if is_digit => Chunk::Number(n),
            _ => Chunk::Text(chunk.to_string()),
        });
        rest = tail;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use mictools_store::MemoryStore;

    #[test]
    fn natural_order() {
        let mut names = vec!["t10", "t2", "t1", "a", "t02b"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["a", "t1", "t2", "t02b", "t10"]);
    }

    #[test]
    fn two_dimensional_values() {
        let extractor = VoxelGridExtractor::new(Dimensionality::Two);
        assert_eq!(extractor.dimensions(&[4, 3, 7]).unwrap(), [4, 3, 1]);
        assert_eq!(extractor.spacing(&[0.5, 0.25]).unwrap(), [0.5, 0.25, 0.5]);
        assert_eq!(extractor.origin_values(&[1.0, 2.0, 3.0]).unwrap(), [1.0, 2.0, 0.0]);
    }

    #[test]
    fn three_dimensional_values() {
        let extractor = VoxelGridExtractor::new(Dimensionality::Three);
        assert_eq!(extractor.dimensions(&[4, 3, 7]).unwrap(), [4, 3, 7]);
        assert!(matches!(
            extractor.dimensions(&[4, 3]),
            Err(Error::Dimensionality(_))
        ));
    }

    #[test]
    fn non_positive_dimensions() {
        let extractor = VoxelGridExtractor::new(Dimensionality::Three);
        assert!(matches!(
            extractor.dimensions(&[4, 0, 7]),
            Err(Error::Dimensionality(_))
        ));
        assert!(matches!(
            extractor.dimensions(&[4, 3, -1]),
            Err(Error::Dimensionality(_))
        ));
    }

    #[test]
    fn properties_from_store() {
        let store = MemoryStore::new()
            .with("/ids", Array::from_floats(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
            .unwrap()
            .with("/geometry/dims", Array::from_ints(vec![3, 2, 1]))
            .unwrap()
            .with("/geometry/spacing", Array::from_floats(vec![0.1, 0.1, 0.1]))
            .unwrap()
            .with("/geometry/origin", Array::from_floats(vec![1.0, 0.0, 0.0]))
            .unwrap()
            .with("/time", Array::from_floats(vec![2.5]))
            .unwrap();

        let grid = VoxelGridExtractor::new(Dimensionality::Three)
            .origin(Some(GridValue::Path("/geometry/origin".into())))
            .time(Some(GridValue::Path("/time".into())))
            .extract(
                &store,
                "/ids",
                &GridValue::Path("/geometry/dims".into()),
                &GridValue::Path("geometry.spacing".into()),
                None,
            )
            .unwrap();

        assert_eq!(grid.dimensions, [3, 2, 1]);
        assert_eq!(grid.origin, [1.0, 0.0, 0.0]);
        assert_eq!(grid.time, Some(2.5));
        assert_eq!(grid.grain_ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn missing_time_is_not_an_error() {
        let store = MemoryStore::new()
            .with("/ids", Array::from_ints(vec![1, 2]))
            .unwrap();
        let grid = VoxelGridExtractor::new(Dimensionality::Two)
            .time(Some(GridValue::Path("/missing".into())))
            .extract(&store, "/ids", &GridValue::Values(vec![2, 1]), &GridValue::Values(vec![1.0, 1.0]), None)
            .unwrap();
        assert_eq!(grid.time, None);
    }

    #[test]
    fn fractional_ids_rejected() {
        let store = MemoryStore::new()
            .with("/ids", Array::from_floats(vec![1.0, 1.5]))
            .unwrap();
        let result = VoxelGridExtractor::new(Dimensionality::Two).extract(
            &store,
            "/ids",
            &GridValue::Values(vec![2, 1]),
            &GridValue::Values(vec![1.0, 1.0]),
            None,
        );
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn snapshots_from_leading_axis() {
        let series = Array::from_ints((0..12).collect()).reshape(vec![3, 4]).unwrap();
        let store = MemoryStore::new().with("/series", series).unwrap();
        let snapshots = read_snapshots(&store, "/series").unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[2], vec![8, 9, 10, 11]);
    }

    #[test]
    fn snapshots_from_dotted_group() {
        let store = MemoryStore::new()
            .with("/CellData/Series/0", Array::from_ints(vec![1, 1]))
            .unwrap()
            .with("/CellData/Series/1", Array::from_ints(vec![2, 2]))
            .unwrap();
        let snapshots = read_snapshots(&store, "CellData.Series").unwrap();
        assert_eq!(snapshots, vec![vec![1, 1], vec![2, 2]]);
    }

    #[test]
    fn flat_series_rejected() {
        let store = MemoryStore::new()
            .with("/series", Array::from_ints(vec![1, 2, 3]))
            .unwrap();
        assert!(matches!(
            read_snapshots(&store, "/series"),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
