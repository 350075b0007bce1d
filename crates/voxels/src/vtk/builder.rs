// crate modules
use crate::vtk::{VtkDataType, VtkOptions};

// external crates
use log::warn;

/// Builder implementation for VtkOptions configuration
///
/// The fields of [VtkOptions] are left public for direct use but the module
/// also implements a builder.
///
/// The builder allows for chained setter calls for a functional approach that
/// could be considered more readable. Any number of parameters can be set this
/// way (including none).
///
/// To get the final [VtkOptions] from the builder, call
/// [build()](VtkOptionsBuilder::build).
///
/// ```rust, no_run
/// # use mictools_voxels::vtk::{write_legacy, VtkDataType, VtkOptions};
/// # use mictools_voxels::VoxelGrid;
/// # let grid = VoxelGrid::new([1, 1, 1], [1.0; 3], vec![1]).unwrap();
/// let options = VtkOptions::builder()
///     .field_name("FeatureIds")
///     .data_type(VtkDataType::UnsignedInt)
///     .columns(12)
///     .embed_time(true)
///     .build();
///
/// write_legacy(&grid, "./grains.vtk", &options).unwrap();
/// ```
pub struct VtkOptionsBuilder {
    version: f64,
    columns: usize,
    field_name: String,
    data_type: VtkDataType,
    embed_time: bool,
    timestep_suffix: String,
}

impl VtkOptionsBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [VtkOptions] type
    pub fn build(self) -> VtkOptions {
        VtkOptions {
            version: self.version,
            columns: self.columns,
            field_name: self.field_name,
            data_type: self.data_type,
            embed_time: self.embed_time,
            timestep_suffix: self.timestep_suffix,
        }
    }

    /// Legacy file format version, written with one decimal
    pub fn version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    /// Number of values written per line
    ///
    /// Very long lines are valid VTK but awkward for most text tools.
    pub fn columns(mut self, columns: usize) -> Self {
        if columns > 1000 {
            warn!("Writing {columns} values per line");
        }
        self.columns = columns;
        self
    }

    /// Name of the scalar field, `GrainID` by default
    pub fn field_name(mut self, name: &str) -> Self {
        self.field_name = name.to_string();
        self
    }

    /// Type name written for the scalar field
    pub fn data_type(mut self, data_type: VtkDataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Write every snapshot of a time series into one file
    pub fn embed_time(mut self, embed: bool) -> Self {
        self.embed_time = embed;
        self
    }

    /// Text between the file stem and snapshot index for separate files
    pub fn timestep_suffix(mut self, suffix: &str) -> Self {
        self.timestep_suffix = suffix.to_string();
        self
    }
}

impl Default for VtkOptionsBuilder {
    fn default() -> Self {
        Self {
            version: 2.0,
            columns: 9,
            field_name: "GrainID".to_string(),
            data_type: VtkDataType::Int,
            embed_time: false,
            timestep_suffix: "_t".to_string(),
        }
    }
}
