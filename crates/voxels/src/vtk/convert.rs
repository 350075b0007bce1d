//! Export of voxel grids through `vtkio`

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::cell_data::{AttributeType, CellArray};
use crate::error::{Error, Result};
use crate::grid::VoxelGrid;

// mictools modules
use mictools_format::{f, OptionFormat};
use mictools_store::ArrayData;

// external crates
use log::info;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, DataArray, DataSet, ElementType, Extent, IOBuffer,
    ImageDataPiece, Piece, Version, Vtk,
};

/// Output formats available through `vtkio`
///
/// These are for plotting in ParaView, VisIt and the like. MICRESS itself
/// reads the files from [VtkWriter](crate::vtk::VtkWriter).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VtkFormat {
    /// XML image data (`.vti`)
    #[default]
    Xml,
    /// Legacy ASCII (`.vtk`)
    LegacyAscii,
    /// Legacy big endian binary (`.vtk`)
    LegacyBinary,
}

impl VtkFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "vti",
            Self::LegacyAscii | Self::LegacyBinary => "vtk",
        }
    }
}

/// Convert a [VoxelGrid] into a `vtkio` image data set
///
/// Follows the same convention as the legacy writer with embedded time: a
/// single grid becomes one cell field called `field_name`, a time series one
/// `<field_name>_<index>` field per snapshot and no base field. Extra cell
/// data follows as further cell attributes.
///
/// Fails with [Error::Dimensionality] if a point count does not fit the `u32`
/// extents of `vtkio`.
///
/// ```rust
/// # use mictools_voxels::VoxelGrid;
/// # use mictools_voxels::vtk::grid_to_vtk;
/// let grid = VoxelGrid::new([2, 2, 1], [1.0, 1.0, 1.0], vec![1, 1, 2, 2]).unwrap();
/// let vtk = grid_to_vtk(&grid, "GrainID").unwrap();
/// assert_eq!(vtk.title, "t=? s");
/// ```
pub fn grid_to_vtk(grid: &VoxelGrid, field_name: &str) -> Result<Vtk> {
    grid.validate_dimensions()?;
    let [nx, ny, nz] = grid.n_points();
    let points = [to_u32(nx)?, to_u32(ny)?, to_u32(nz)?];

    let mut attributes = Attributes::new();
    if grid.is_time_series() {
        for (i, ids) in grid.timesteps.iter().enumerate() {
            attributes
                .cell
                .push(cell_scalars(&f!("{field_name}_{i}"), ids));
        }
    } else {
        attributes.cell.push(cell_scalars(field_name, &grid.grain_ids));
    }
    for array in &grid.cell_data {
        attributes.cell.push(cell_array(array)?);
    }

    Ok(Vtk {
        version: Version::Auto,
        title: f!("t={} s", grid.time.map(|t| f!("{t:.5}")).display_or("?")),
        byte_order: ByteOrder::BigEndian,
        file_path: None,
        data: DataSet::ImageData {
            extent: Extent::Dims(points),
            origin: grid.origin.map(|o| o as f32),
            spacing: grid.spacing.map(|s| s as f32),
            meta: None,
            pieces: vec![Piece::Inline(Box::new(ImageDataPiece {
                extent: Extent::Dims(points),
                data: attributes,
            }))],
        },
    })
}

/// Write a `vtkio` data set in the chosen format
///
/// The extension of `path` is replaced with the conventional one for the
/// format, and the final path is returned.
pub fn write_vtk<P: AsRef<Path>>(vtk: Vtk, path: P, format: VtkFormat) -> Result<PathBuf> {
    let path = path.as_ref().with_extension(format.extension());
    match format {
        VtkFormat::Xml => vtkio::export(vtk, &path)?,
        VtkFormat::LegacyAscii => vtkio::export_ascii(vtk, &path)?,
        VtkFormat::LegacyBinary => vtkio::export_be(vtk, &path)?,
    }
    info!("Written {format:?} vtk to {path:?}");
    Ok(path)
}

fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| {
        Error::Dimensionality(f!("{n} points along an axis is too many for vtkio"))
    })
}

fn cell_array(array: &CellArray) -> Result<Attribute> {
    let components = u32::try_from(array.components).map_err(|_| {
        Error::InvalidOptions(f!("too many components in \"{}\"", array.name))
    })?;

    let (name, elem) = match array.attribute {
        AttributeType::Scalars => (
            array.name.clone(),
            ElementType::Scalars {
                num_comp: components,
                lookup_table: None,
            },
        ),
        AttributeType::Vectors => (array.name.clone(), ElementType::Vectors),
        AttributeType::Normals => (array.name.clone(), ElementType::Normals),
        AttributeType::Tensors => (array.name.clone(), ElementType::Tensors),
        AttributeType::Field => {
            let member = array.field_array.as_deref().unwrap_or(array.name.as_str());
            (f!("{}_{member}", array.name), ElementType::Generic(components))
        }
    };

    let data = match &array.values {
        ArrayData::Int(values) => IOBuffer::I64(values.clone()),
        ArrayData::Float(values) => IOBuffer::F64(values.clone()),
    };

    Ok(Attribute::DataArray(DataArray { name, elem, data }))
}

fn cell_scalars(name: &str, ids: &[i64]) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::I64(ids.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_names(vtk: &Vtk) -> Vec<String> {
        let DataSet::ImageData { pieces, .. } = &vtk.data else {
            panic!("expected image data")
        };
        let Piece::Inline(piece) = &pieces[0] else {
            panic!("expected an inline piece")
        };
        piece
            .data
            .cell
            .iter()
            .map(|attribute| match attribute {
                Attribute::DataArray(array) => array.name.clone(),
                other => panic!("unexpected attribute {other:?}"),
            })
            .collect()
    }

    #[test]
    fn image_data_layout() {
        let grid = VoxelGrid::new([2, 2, 1], [0.5, 0.5, 0.5], vec![1, 1, 2, 2])
            .unwrap()
            .with_time(Some(3.0))
            .with_timesteps(vec![vec![1, 2, 3, 4]])
            .unwrap();
        let vtk = grid_to_vtk(&grid, "GrainID").unwrap();

        assert_eq!(vtk.title, "t=3.00000 s");
        match vtk.data {
            DataSet::ImageData {
                extent,
                spacing,
                pieces,
                ..
            } => {
                assert_eq!(extent, Extent::Dims([3, 3, 2]));
                assert_eq!(spacing, [0.5, 0.5, 0.5]);
                let Piece::Inline(piece) = &pieces[0] else {
                    panic!("expected an inline piece")
                };
                assert_eq!(piece.data.cell.len(), 1);
            }
            other => panic!("unexpected data set {other:?}"),
        }
    }

    #[test]
    fn snapshots_replace_base_field() {
        let grid = VoxelGrid::new([2, 1, 1], [1.0; 3], vec![1, 2]).unwrap();
        assert_eq!(cell_names(&grid_to_vtk(&grid, "GrainID").unwrap()), vec!["GrainID"]);

        let series = grid
            .with_timesteps(vec![vec![1, 2], vec![2, 2]])
            .unwrap()
            .with_cell_data(vec![CellArray {
                name: "orientation".to_string(),
                data_type: crate::vtk::VtkDataType::Double,
                attribute: AttributeType::Field,
                components: 2,
                field_array: Some("angles".to_string()),
                values: ArrayData::Float(vec![0.0, 0.5, 1.0, 1.5]),
            }])
            .unwrap();
        assert_eq!(
            cell_names(&grid_to_vtk(&series, "GrainID").unwrap()),
            vec!["GrainID_0", "GrainID_1", "orientation_angles"]
        );
    }

    #[test]
    fn point_counts_must_fit_u32() {
        assert_eq!(to_u32(7).unwrap(), 7);
        assert!(matches!(
            to_u32(u32::MAX as usize + 1),
            Err(Error::Dimensionality(_))
        ));
    }

    #[test]
    fn extensions() {
        assert_eq!(VtkFormat::Xml.extension(), "vti");
        assert_eq!(VtkFormat::LegacyBinary.extension(), "vtk");
    }
}
