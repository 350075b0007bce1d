//! Writing voxel grids to VTK formats
//!
//! MICRESS reads grain structures from legacy ASCII structured points files,
//! which are written by [VtkWriter] exactly as MICRESS expects them.
//!
//! For plotting, [grid_to_vtk()] and [write_vtk()] also export the grid
//! through `vtkio` as XML image data or legacy binary.

mod builder;
mod convert;
mod legacy;

#[doc(inline)]
pub use builder::VtkOptionsBuilder;

#[doc(inline)]
pub use legacy::{timestep_path, write_legacy, VtkDataType, VtkOptions, VtkWriter};

#[doc(inline)]
pub use convert::{grid_to_vtk, write_vtk, VtkFormat};
