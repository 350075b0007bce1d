//! Legacy ASCII structured points files in the layout MICRESS reads

// standard library
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::cell_data::{AttributeType, CellArray};
use crate::error::{Error, Result};
use crate::grid::VoxelGrid;
use crate::vtk::VtkOptionsBuilder;

// mictools modules
use mictools_format::{f, NumFormat, OptionFormat};
use mictools_store::ArrayData;

// external crates
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Legacy VTK type name written after a data name
///
/// Grain ids are always integers and need one of the integer types. The
/// floating point types are for extra cell data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VtkDataType {
    /// `bit`, 0 or 1
    Bit,
    /// `unsigned_char`, 8 bit unsigned
    UnsignedChar,
    /// `char`, 8 bit signed
    Char,
    /// `unsigned_short`, 16 bit unsigned
    UnsignedShort,
    /// `short`, 16 bit signed
    Short,
    /// `unsigned_int`, 32 bit unsigned
    UnsignedInt,
    /// `int`, 32 bit signed
    #[default]
    Int,
    /// `unsigned_long`, 64 bit unsigned
    UnsignedLong,
    /// `long`, 64 bit signed
    Long,
    /// `float`, single precision
    Float,
    /// `double`, double precision
    Double,
}

impl VtkDataType {
    /// True for every type except `float` and `double`
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Float | Self::Double)
    }
}

impl std::fmt::Display for VtkDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Bit => "bit",
            Self::UnsignedChar => "unsigned_char",
            Self::Char => "char",
            Self::UnsignedShort => "unsigned_short",
            Self::Short => "short",
            Self::UnsignedInt => "unsigned_int",
            Self::Int => "int",
            Self::UnsignedLong => "unsigned_long",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        };
        write!(f, "{name}")
    }
}

/// Formatting options for MICRESS structured points files
///
/// The fields are public for direct use, and also deserialise from the `vtk`
/// section of a conversion config. For chained setters see
/// [VtkOptions::builder()].
///
/// # Time series
///
/// Grids with snapshots are written in one of two ways:
///
/// - `embed_time = false` (default): one file per snapshot, named
///   `<stem><timestep_suffix><index>.<ext>` with a 0-based index, e.g.
///   `grains_t0.vtk`, `grains_t1.vtk`, ...
/// - `embed_time = true`: a single file at the destination with one
///   `CELL_DATA` block per snapshot, fields named `<field_name>_<index>`.
///
/// Only the snapshots are written for a time series. Extra cell data is
/// written once per file, after the grain ids.
///
/// Every snapshot is held in memory from extraction until writing, so the
/// whole series is checked against the grid before the first file is
/// created. Memory use grows with the number of snapshots times the number
/// of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VtkOptions {
    /// Legacy file format version in the header
    pub version: f64,
    /// Number of values per line
    pub columns: usize,
    /// Name of the scalar field
    pub field_name: String,
    /// Type name of the scalar field, one of the integer types
    pub data_type: VtkDataType,
    /// Put every snapshot into one file
    pub embed_time: bool,
    /// Text between the file stem and the snapshot index
    pub timestep_suffix: String,
}

impl VtkOptions {
    /// Get an instance of the [VtkOptionsBuilder]
    pub fn builder() -> VtkOptionsBuilder {
        VtkOptionsBuilder::default()
    }

    /// Fail with [Error::InvalidOptions] on unusable settings
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(Error::InvalidOptions(
                "at least one column is required".to_string(),
            ));
        }
        if self.field_name.is_empty() || self.field_name.contains(char::is_whitespace) {
            return Err(Error::InvalidOptions(f!(
                "field name \"{}\" must be a single word",
                self.field_name
            )));
        }
        if !self.data_type.is_integer() {
            return Err(Error::InvalidOptions(f!(
                "grain ids cannot be written as {}",
                self.data_type
            )));
        }
        Ok(())
    }
}

impl Default for VtkOptions {
    fn default() -> Self {
        VtkOptionsBuilder::default().build()
    }
}

/// Writer for MICRESS structured points files
///
/// Produces the legacy ASCII layout MICRESS reads, with the grain id of every
/// cell written x fastest:
///
/// ```text
/// # vtk DataFile Version 2.0
/// t=? s
/// ASCII
/// DATASET STRUCTURED_POINTS
/// DIMENSIONS 3 3 2
/// SPACING 1 1 1
/// ORIGIN 0 0 0
/// CELL_DATA 4
/// SCALARS GrainID int
/// LOOKUP_TABLE default
/// 1 1 2 2
/// ```
///
/// `DIMENSIONS` counts grid points, one more than the cells along each axis.
/// Output is identical for identical input and options.
///
/// ```rust
/// # use mictools_voxels::VoxelGrid;
/// # use mictools_voxels::vtk::{VtkOptions, VtkWriter};
/// let grid = VoxelGrid::new([2, 2, 1], [1.0, 1.0, 1.0], vec![1, 1, 2, 2]).unwrap();
/// let writer = VtkWriter::new(VtkOptions::default());
///
/// let mut text = Vec::new();
/// writer.write_document(&mut text, &grid, &[("GrainID".into(), &grid.grain_ids)]).unwrap();
///
/// let text = String::from_utf8(text).unwrap();
/// assert!(text.contains("CELL_DATA 4\n"));
/// assert!(text.ends_with("LOOKUP_TABLE default\n1 1 2 2\n"));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VtkWriter {
    /// Layout and naming used for every file written
    pub options: VtkOptions,
}

impl VtkWriter {
    /// New writer with the given options
    pub fn new(options: VtkOptions) -> Self {
        Self { options }
    }

    /// Write `grid` to `path`, returning every file written
    ///
    /// Everything is validated before the first file is created. A write
    /// failure part way through a series leaves the earlier files in place.
    pub fn write<P: AsRef<Path>>(&self, grid: &VoxelGrid, path: P) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        self.options.validate()?;
        grid.validate_dimensions()?;

        let field = &self.options.field_name;
        let written = if !grid.is_time_series() {
            self.write_file(path, grid, &[(field.clone(), &grid.grain_ids)])?;
            vec![path.to_path_buf()]
        } else if self.options.embed_time {
            let fields = grid
                .timesteps
                .iter()
                .enumerate()
                .map(|(i, ids)| (f!("{field}_{i}"), ids))
                .collect::<Vec<(String, &Vec<i64>)>>();
            self.write_file(path, grid, &fields)?;
            vec![path.to_path_buf()]
        } else {
            let mut written = Vec::with_capacity(grid.timesteps.len());
            for (i, ids) in grid.timesteps.iter().enumerate() {
                let snapshot_path = timestep_path(path, &self.options.timestep_suffix, i);
                self.write_file(&snapshot_path, grid, &[(field.clone(), ids)])?;
                written.push(snapshot_path);
            }
            written
        };

        info!("Written {} vtk file(s) to {path:?}", written.len());
        Ok(written)
    }

    /// Write one document with a header and a cell data block per field
    ///
    /// Extra cell data of the grid follows the last block.
    pub fn write_document<W: Write>(
        &self,
        writer: &mut W,
        grid: &VoxelGrid,
        fields: &[(String, &Vec<i64>)],
    ) -> std::io::Result<()> {
        self.write_header(writer, grid)?;
        for (name, values) in fields {
            self.write_cell_data(writer, name, values)?;
        }
        if fields.is_empty() && !grid.cell_data.is_empty() {
            writeln!(writer, "CELL_DATA {}", grid.n_cells())?;
        }
        self.write_attributes(writer, &grid.cell_data)
    }

    fn write_file(&self, path: &Path, grid: &VoxelGrid, fields: &[(String, &Vec<i64>)]) -> Result<()> {
        let io_error = |source| Error::IOWriteError {
            path: path.to_path_buf(),
            source,
        };

        debug!("Writing {path:?}");
        let mut writer = init_writer(path).map_err(io_error)?;
        self.write_document(&mut writer, grid, fields)
            .map_err(io_error)?;
        writer.flush().map_err(io_error)
    }

    fn write_header<W: Write>(&self, writer: &mut W, grid: &VoxelGrid) -> std::io::Result<()> {
        let time = grid.time.map(|t| f!("{t:.5}"));

        writeln!(writer, "# vtk DataFile Version {:.1}", self.options.version)?;
        writeln!(writer, "t={} s", time.display_or("?"))?;
        writeln!(writer, "ASCII")?;
        writeln!(writer, "DATASET STRUCTURED_POINTS")?;
        writeln!(writer, "DIMENSIONS {}", join(grid.n_points()))?;
        writeln!(writer, "SPACING {}", join(grid.spacing.map(|s| s.decimal(None))))?;
        writeln!(writer, "ORIGIN {}", join(grid.origin.map(|o| o.decimal(None))))
    }

    fn write_cell_data<W: Write>(
        &self,
        writer: &mut W,
        name: &str,
        values: &[i64],
    ) -> std::io::Result<()> {
        writeln!(writer, "CELL_DATA {}", values.len())?;
        writeln!(writer, "SCALARS {name} {}", self.options.data_type)?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for line in values.chunks(self.options.columns) {
            writeln!(writer, "{}", join(line))?;
        }
        Ok(())
    }

    /// Attribute blocks in the order given, then `FIELD` blocks by name
    fn write_attributes<W: Write>(&self, writer: &mut W, arrays: &[CellArray]) -> std::io::Result<()> {
        let mut fields: BTreeMap<&str, Vec<&CellArray>> = BTreeMap::new();

        for array in arrays {
            match array.attribute {
                AttributeType::Field => {
                    fields.entry(array.name.as_str()).or_default().push(array);
                    continue;
                }
                AttributeType::Scalars if array.components > 1 => {
                    writeln!(
                        writer,
                        "SCALARS {} {} {}",
                        array.name, array.data_type, array.components
                    )?;
                    writeln!(writer, "LOOKUP_TABLE default")?;
                }
                AttributeType::Scalars => {
                    writeln!(writer, "SCALARS {} {}", array.name, array.data_type)?;
                    writeln!(writer, "LOOKUP_TABLE default")?;
                }
                attribute => {
                    writeln!(
                        writer,
                        "{} {} {}",
                        attribute.keyword(),
                        array.name,
                        array.data_type
                    )?;
                }
            }
            self.write_values(writer, &array.values)?;
        }

        for (name, members) in fields {
            writeln!(writer, "FIELD {name} {}", members.len())?;
            for array in members {
                writeln!(
                    writer,
                    "{} {} {} {}",
                    array.field_array.as_deref().unwrap_or(array.name.as_str()),
                    array.components,
                    array.n_tuples(),
                    array.data_type
                )?;
                self.write_values(writer, &array.values)?;
            }
        }
        Ok(())
    }

    fn write_values<W: Write>(&self, writer: &mut W, values: &ArrayData) -> std::io::Result<()> {
        match values {
            ArrayData::Int(values) => {
                for line in values.chunks(self.options.columns) {
                    writeln!(writer, "{}", join(line))?;
                }
            }
            ArrayData::Float(values) => {
                for line in values.chunks(self.options.columns) {
                    writeln!(writer, "{}", join(line.iter().map(|v| v.decimal(None))))?;
                }
            }
        }
        Ok(())
    }
}

/// Write `grid` to `path` with the given options
///
/// Shorthand for [VtkWriter::write()].
pub fn write_legacy<P: AsRef<Path>>(
    grid: &VoxelGrid,
    path: P,
    options: &VtkOptions,
) -> Result<Vec<PathBuf>> {
    VtkWriter::new(options.clone()).write(grid, path)
}

/// File name for one snapshot, `<stem><suffix><index>.<ext>`
///
/// ```rust
/// # use mictools_voxels::vtk::timestep_path;
/// # use std::path::PathBuf;
/// let path = timestep_path("out/grains.vtk", "_t", 3);
/// assert_eq!(path, PathBuf::from("out/grains_t3.vtk"));
/// ```
pub fn timestep_path<P: AsRef<Path>>(path: P, suffix: &str, index: usize) -> PathBuf {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => f!("{stem}{suffix}{index}.{}", ext.to_string_lossy()),
        None => f!("{stem}{suffix}{index}"),
    };
    path.with_file_name(name)
}

/// Space separated values
fn join<T: std::fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer(path: &Path) -> std::io::Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(grid: &VoxelGrid, options: VtkOptions) -> String {
        let writer = VtkWriter::new(options);
        let mut buffer = Vec::new();
        writer
            .write_document(&mut buffer, grid, &[("GrainID".into(), &grid.grain_ids)])
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn full_document() {
        let grid = VoxelGrid::new([3, 2, 1], [0.5, 0.5, 0.5], vec![1, 2, 3, 4, 5, 6])
            .unwrap()
            .with_origin([1.0, 0.0, -2.5])
            .with_time(Some(1.25));
        let options = VtkOptions::builder().columns(4).version(3.0).build();

        assert_eq!(
            render(&grid, options),
            "# vtk DataFile Version 3.0\n\
             t=1.25000 s\n\
             ASCII\n\
             DATASET STRUCTURED_POINTS\n\
             DIMENSIONS 4 3 2\n\
             SPACING 0.5 0.5 0.5\n\
             ORIGIN 1 0 -2.5\n\
             CELL_DATA 6\n\
             SCALARS GrainID int\n\
             LOOKUP_TABLE default\n\
             1 2 3 4\n\
             5 6\n"
        );
    }

    #[test]
    fn default_columns() {
        let grid = VoxelGrid::new([20, 1, 1], [1.0; 3], (1..=20).collect()).unwrap();
        let text = render(&grid, VtkOptions::default());
        let values = text.lines().skip(10).collect::<Vec<&str>>();
        assert_eq!(
            values,
            vec![
                "1 2 3 4 5 6 7 8 9",
                "10 11 12 13 14 15 16 17 18",
                "19 20"
            ]
        );
    }

    #[test]
    fn data_type_names() {
        assert_eq!(VtkDataType::UnsignedShort.to_string(), "unsigned_short");
        assert_eq!(VtkDataType::default().to_string(), "int");
        assert_eq!(VtkDataType::Double.to_string(), "double");
        assert!(!VtkDataType::Float.is_integer());
    }

    #[test]
    fn extra_cell_data() {
        let array = |name: &str,
                     attribute: AttributeType,
                     components: usize,
                     field_array: Option<&str>,
                     values: ArrayData| CellArray {
            name: name.to_string(),
            data_type: VtkDataType::Float,
            attribute,
            components,
            field_array: field_array.map(str::to_string),
            values,
        };

        let grid = VoxelGrid::new([2, 1, 1], [1.0; 3], vec![1, 2])
            .unwrap()
            .with_cell_data(vec![
                array("b", AttributeType::Field, 1, Some("y"), ArrayData::Float(vec![5.0, 6.0])),
                array("conf", AttributeType::Scalars, 1, None, ArrayData::Float(vec![0.5, 1.0])),
                array("a", AttributeType::Field, 2, Some("x"), ArrayData::Int(vec![1, 2, 3, 4])),
                array(
                    "dir",
                    AttributeType::Vectors,
                    3,
                    None,
                    ArrayData::Float(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.25]),
                ),
            ])
            .unwrap();

        let text = render(&grid, VtkOptions::default());
        let tail = text.split_once("1 2\n").unwrap().1;
        assert_eq!(
            tail,
            "SCALARS conf float\n\
             LOOKUP_TABLE default\n\
             0.5 1\n\
             VECTORS dir float\n\
             1 0 0 0 1 0.25\n\
             FIELD a 1\n\
             x 2 2 float\n\
             1 2 3 4\n\
             FIELD b 1\n\
             y 1 2 float\n\
             5 6\n"
        );
        assert_eq!(text.matches("CELL_DATA").count(), 1);
    }

    #[test]
    fn invalid_options() {
        let grid = VoxelGrid::new([1, 1, 1], [1.0; 3], vec![1]).unwrap();
        let path = std::env::temp_dir().join("mictools_never_written.vtk");

        let options = VtkOptions::builder().columns(0).build();
        assert!(matches!(
            VtkWriter::new(options).write(&grid, &path),
            Err(Error::InvalidOptions(_))
        ));

        let options = VtkOptions::builder().field_name("Grain ID").build();
        assert!(matches!(
            VtkWriter::new(options).write(&grid, &path),
            Err(Error::InvalidOptions(_))
        ));

        let options = VtkOptions::builder().data_type(VtkDataType::Float).build();
        assert!(matches!(
            VtkWriter::new(options).write(&grid, &path),
            Err(Error::InvalidOptions(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn snapshot_names() {
        assert_eq!(timestep_path("a.vtk", "_t", 0), PathBuf::from("a_t0.vtk"));
        assert_eq!(timestep_path("dir/a", "-", 12), PathBuf::from("dir/a-12"));
    }
}
