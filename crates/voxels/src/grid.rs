//! Module for the voxel grid data and implementations

// crate modules
use crate::cell_data::CellArray;
use crate::error::{Error, Result};

// mictools modules
use mictools_format::f;

// external crates
use serde::{Deserialize, Serialize};

/// Spatial dimensionality of the microstructure
///
/// Serialised as the plain integers `2` and `3`.
///
/// ```rust
/// # use mictools_voxels::Dimensionality;
/// assert_eq!(Dimensionality::try_from(2).unwrap(), Dimensionality::Two);
/// assert!(Dimensionality::try_from(4).is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensionality {
    /// A single layer of cells, `nz = 1`
    Two,
    /// A full volume
    #[default]
    Three,
}

impl Dimensionality {
    /// Number of spatial axes in use
    pub fn axes(&self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for Dimensionality {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(Error::Dimensionality(f!(
                "dimensionality must be 2 or 3, found {value}"
            ))),
        }
    }
}

impl From<Dimensionality> for u8 {
    fn from(value: Dimensionality) -> Self {
        value.axes() as u8
    }
}

/// A regular grid of voxels, each holding a grain id
///
/// Cells are ordered with x varying fastest, then y, then z. This is exactly
/// the row-major order of a DREAM3D cell array with shape `(nz, ny, nx, 1)`,
/// so ids are carried over from the input without any reordering.
///
/// ```rust
/// # use mictools_voxels::VoxelGrid;
/// let grid = VoxelGrid::new([2, 2, 1], [1.0, 1.0, 1.0], vec![1, 1, 2, 2]).unwrap();
/// assert_eq!(grid.n_cells(), 4);
/// assert_eq!(grid.grain_at(1, 0, 0), Some(1));
/// assert_eq!(grid.grain_at(0, 1, 0), Some(2));
/// ```
///
/// A time series holds one further id array per snapshot, every one of them
/// filling the same grid. Extra per-cell arrays, such as orientations or
/// confidence values, are carried in `cell_data`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    /// Number of cells along each axis `[nx, ny, nz]`
    pub dimensions: [usize; 3],
    /// Cell size along each axis
    pub spacing: [f64; 3],
    /// Position of the grid corner
    pub origin: [f64; 3],
    /// Grain id of every cell, x fastest
    pub grain_ids: Vec<i64>,
    /// Grain ids of every cell for each snapshot of a time series
    pub timesteps: Vec<Vec<i64>>,
    /// Simulation time of the structure, if known
    pub time: Option<f64>,
    /// Extra arrays written with the grain ids
    pub cell_data: Vec<CellArray>,
}

impl VoxelGrid {
    /// Create a grid at the origin, checking that the ids fill it exactly
    pub fn new(dimensions: [usize; 3], spacing: [f64; 3], grain_ids: Vec<i64>) -> Result<Self> {
        let grid = Self {
            dimensions,
            spacing,
            origin: [0.0; 3],
            grain_ids,
            timesteps: Vec::new(),
            time: None,
            cell_data: Vec::new(),
        };
        grid.validate_dimensions()?;

        if grid.grain_ids.len() != grid.n_cells() {
            return Err(Error::ShapeMismatch {
                expected: grid.n_cells(),
                found: grid.grain_ids.len(),
            });
        }
        Ok(grid)
    }

    /// Move the grid corner
    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Attach a simulation time
    pub fn with_time(mut self, time: Option<f64>) -> Self {
        self.time = time;
        self
    }

    /// Attach time series snapshots
    ///
    /// Every snapshot is checked before any is accepted, and the first one
    /// that does not fill the grid is reported by index.
    pub fn with_timesteps(mut self, timesteps: Vec<Vec<i64>>) -> Result<Self> {
        let expected = self.n_cells();
        if let Some((index, snapshot)) = timesteps
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != expected)
        {
            return Err(Error::SnapshotMismatch {
                index,
                expected,
                found: snapshot.len(),
            });
        }
        self.timesteps = timesteps;
        Ok(self)
    }

    /// Attach extra per-cell arrays, each checked against the grid
    pub fn with_cell_data(mut self, arrays: Vec<CellArray>) -> Result<Self> {
        let n_cells = self.n_cells();
        self.cell_data = arrays
            .into_iter()
            .map(|array| array.checked(n_cells))
            .collect::<Result<Vec<CellArray>>>()?;
        Ok(self)
    }

    /// Total number of cells, saturating at `usize::MAX`
    pub fn n_cells(&self) -> usize {
        self.dimensions
            .iter()
            .try_fold(1usize, |total, n| total.checked_mul(*n))
            .unwrap_or(usize::MAX)
    }

    /// Number of grid points along each axis, one more than the cells
    pub fn n_points(&self) -> [usize; 3] {
        self.dimensions.map(|n| n + 1)
    }

    /// True if there are time series snapshots
    pub fn is_time_series(&self) -> bool {
        !self.timesteps.is_empty()
    }

    /// True if the cells have the same size along every axis
    pub fn is_cubic(&self) -> bool {
        let [dx, dy, dz] = self.spacing;
        dx == dy && dy == dz
    }

    /// Flat index of cell `(x, y, z)`, if it is inside the grid
    pub fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let [nx, ny, nz] = self.dimensions;
        if x < nx && y < ny && z < nz {
            Some(x + nx * (y + ny * z))
        } else {
            None
        }
    }

    /// Grain id of cell `(x, y, z)`
    pub fn grain_at(&self, x: usize, y: usize, z: usize) -> Option<i64> {
        self.index(x, y, z).map(|i| self.grain_ids[i])
    }

    /// Fail with [Error::Dimensionality] on any empty axis, or a grid too
    /// large to count its cells and points
    pub fn validate_dimensions(&self) -> Result<()> {
        if self.dimensions.iter().any(|n| *n == 0) {
            return Err(Error::Dimensionality(f!(
                "every axis needs at least one cell, found {:?}",
                self.dimensions
            )));
        }
        if checked_points(&self.dimensions).is_none() {
            return Err(Error::Dimensionality(f!(
                "grid {:?} has too many cells to address",
                self.dimensions
            )));
        }
        Ok(())
    }
}

/// Total number of grid points, `None` on overflow
///
/// Points outnumber cells, so this also bounds the cell count.
fn checked_points(dimensions: &[usize; 3]) -> Option<usize> {
    dimensions
        .iter()
        .try_fold(1usize, |total, n| total.checked_mul(n.checked_add(1)?))
}
