//! Voxel grain-id grids and MICRESS structured points files
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod cell_data;
mod error;
mod extract;
mod grid;

pub mod vtk;

// inline important the voxel-related modules for a nice public API
#[doc(inline)]
pub use grid::{Dimensionality, VoxelGrid};

#[doc(inline)]
pub use cell_data::{AttributeType, CellArray, CellDataSpec, FieldArray};

#[doc(inline)]
pub use extract::{GridValue, VoxelGridExtractor};

#[doc(inline)]
pub use vtk::{write_legacy, VtkOptions, VtkWriter};

#[doc(inline)]
pub use error::{Error, Result};
