//! Conversion configuration read from JSON

// standard library
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};
use crate::report::Artifact;

// mictools modules
use mictools_format::f;
use mictools_grains::{AngleUnit, Rotation, TxtOptions};
use mictools_voxels::{AttributeType, CellDataSpec, Dimensionality, GridValue, VtkOptions};

// external crates
use log::info;
use serde::{Deserialize, Serialize};

/// Everything needed for one conversion run
///
/// Only `input`, `dim` and `output` are required, every other section falls
/// back to its defaults. Unknown keys are rejected so that typos do not go
/// unnoticed.
///
/// ```rust
/// # use mictools_convert::ConversionConfig;
/// let config: ConversionConfig = r#"{
///     "input": "micro.dream3d",
///     "dim": 3,
///     "grid": {
///         "grain_ids": "/DataContainers/SyntheticVolume/CellData/FeatureIds",
///         "dimensions": "/DataContainers/SyntheticVolume/_SIMPL_GEOMETRY/DIMENSIONS",
///         "spacing": [1.0, 1.0, 1.0]
///     },
///     "output": { "vtk": "grains.vtk" }
/// }"#
/// .parse()
/// .unwrap();
///
/// assert_eq!(config.vtk.columns, 9);
/// assert!(config.output.txt.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    /// Hierarchical input file
    pub input: PathBuf,
    /// 2D or 3D structure, `2` or `3`
    pub dim: Dimensionality,
    /// Locations of the per-grain arrays
    #[serde(default)]
    pub grains: Option<GrainsConfig>,
    /// Locations of the per-voxel arrays and grid properties
    #[serde(default)]
    pub grid: Option<GridConfig>,
    /// Output files to produce
    pub output: OutputConfig,
    /// Grain table formatting
    #[serde(default)]
    pub txt: TxtOptions,
    /// Structured points formatting
    #[serde(default)]
    pub vtk: VtkOptions,
    /// Driving file generation
    #[serde(default)]
    pub driving: DrivingConfig,
}

/// Per-grain input arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrainsConfig {
    /// Path of the `(N)` or `(N, 1)` phase array
    pub phases: String,
    /// Path of the `(N, 3)` Euler angle array
    pub euler_angles: String,
    /// Keep the background row 0 as grain 0
    #[serde(default)]
    pub include_background: bool,
    /// Optional change of axis system for orientations
    #[serde(default)]
    pub rotation: Option<Rotation>,
    /// Unit of the Euler angles
    #[serde(default)]
    pub unit: AngleUnit,
}

/// Per-voxel input arrays and grid properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Path of the per-voxel grain id array
    pub grain_ids: String,
    /// Cell counts, inline or a path
    pub dimensions: GridValue<Vec<i64>>,
    /// Cell sizes, inline or a path
    pub spacing: GridValue<Vec<f64>>,
    /// Grid corner, inline or a path
    #[serde(default)]
    pub origin: Option<GridValue<Vec<f64>>>,
    /// Path of a group or array of grain id snapshots
    #[serde(default)]
    pub time_series: Option<String>,
    /// Simulation time, inline or a path
    #[serde(default)]
    pub time: Option<GridValue<f64>>,
    /// Extra per-cell arrays written after the grain ids, in this order
    #[serde(default)]
    pub cell_data: Vec<CellDataSpec>,
}

impl GridConfig {
    /// Names and tags of the extra cell arrays
    fn check_cell_data(&self) -> Result<()> {
        for spec in &self.cell_data {
            if spec.name.is_empty() || spec.name.contains(char::is_whitespace) {
                return Err(Error::ConfigError(f!(
                    "cell data name \"{}\" must be a single word",
                    spec.name
                )));
            }
            if spec.attribute == AttributeType::Field && spec.field_array.is_none() {
                return Err(Error::ConfigError(f!(
                    "FIELD cell data \"{}\" needs a \"field_array\"",
                    spec.name
                )));
            }
            if spec.tag.as_deref().is_some_and(str::is_empty) {
                return Err(Error::ConfigError(f!(
                    "cell data \"{}\" has an empty driving file tag",
                    spec.name
                )));
            }
        }
        Ok(())
    }
}

/// Output destinations, any of which may be left out
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Grain property table
    pub txt: Option<PathBuf>,
    /// Structured points grain structure
    pub vtk: Option<PathBuf>,
    /// MICRESS driving file, needs `driving.template`
    pub driving: Option<PathBuf>,
}

impl OutputConfig {
    /// Artifacts requested, in the order they are produced
    pub fn requested(&self) -> Vec<Artifact> {
        [
            (Artifact::Txt, &self.txt),
            (Artifact::Vtk, &self.vtk),
            (Artifact::Driving, &self.driving),
        ]
        .into_iter()
        .filter(|(_, path)| path.is_some())
        .map(|(artifact, _)| artifact)
        .collect()
    }
}

/// Driving file generation from a tagged template
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrivingConfig {
    /// Template with `<tag>` placeholders
    pub template: Option<PathBuf>,
    /// Insert absolute paths for the referenced outputs
    pub absolute_paths: bool,
    /// Further `<tag>` to text replacements
    pub tags: BTreeMap<String, String>,
}

impl ConversionConfig {
    /// Check that every requested output has what it needs
    ///
    /// Problems here only affect the artifacts concerned, so [crate::run]
    /// reports them per artifact rather than calling this up front.
    pub fn validate(&self) -> Result<()> {
        self.output
            .requested()
            .into_iter()
            .try_for_each(|artifact| self.check(artifact))
    }

    /// Check a single requested artifact
    pub(crate) fn check(&self, artifact: Artifact) -> Result<()> {
        match artifact {
            Artifact::Txt => self.grains_config().map(|_| ()),
            Artifact::Vtk => self.grid_config().map(|_| ()),
            Artifact::Driving => {
                self.grid_config()?;
                self.driving_template().map(|_| ())
            }
        }
    }

    pub(crate) fn grains_config(&self) -> Result<&GrainsConfig> {
        self.grains.as_ref().ok_or_else(|| {
            Error::ConfigError("the grain table needs a \"grains\" section".to_string())
        })
    }

    pub(crate) fn grid_config(&self) -> Result<&GridConfig> {
        let grid = self.grid.as_ref().ok_or_else(|| {
            Error::ConfigError("the voxel grid needs a \"grid\" section".to_string())
        })?;
        grid.check_cell_data()?;
        Ok(grid)
    }

    pub(crate) fn driving_template(&self) -> Result<&Path> {
        self.driving.template.as_deref().ok_or_else(|| {
            Error::ConfigError("the driving file needs \"driving.template\"".to_string())
        })
    }
}

impl std::str::FromStr for ConversionConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Read a [ConversionConfig] from a JSON file
///
/// Paths inside the file are used as written, so relative paths are relative
/// to the working directory.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<ConversionConfig> {
    let path = path.as_ref();
    info!("Reading configuration {path:?}");
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mictools_grains::Delimiter;
    use std::str::FromStr;

    const FULL: &str = r#"{
        "input": "micro.dream3d",
        "dim": 2,
        "grains": {
            "phases": "/Features/Phases",
            "euler_angles": "/Features/EulerAngles",
            "include_background": true,
            "rotation": "to_micress",
            "unit": "radians"
        },
        "grid": {
            "grain_ids": "/Cells/FeatureIds",
            "dimensions": [64, 32],
            "spacing": "/Geometry/SPACING",
            "origin": [0.0, 0.0],
            "time_series": "/Cells/Series",
            "time": 1.5,
            "cell_data": [
                { "path": "/Cells/EulerAngles", "name": "euler", "data_type": "float",
                  "attribute": "VECTORS", "tag": "<euler>" },
                { "path": "/Cells/Confidence", "name": "ci", "data_type": "double" }
            ]
        },
        "output": { "txt": "grains.txt", "vtk": "grains.vtk", "driving": "run.dri" },
        "txt": { "precision": 4, "delimiter": "comma" },
        "vtk": { "version": 3.0, "columns": 6, "field_name": "Ids",
                 "data_type": "unsigned_int", "embed_time": true, "timestep_suffix": "-" },
        "driving": { "template": "template.dri", "absolute_paths": true,
                     "tags": { "<phases>": "2" } }
    }"#;

    #[test]
    fn full_config() {
        let config = ConversionConfig::from_str(FULL).unwrap();
        assert_eq!(config.dim, Dimensionality::Two);

        let grains = config.grains.as_ref().unwrap();
        assert_eq!(grains.rotation, Some(Rotation::ToMicress));
        assert_eq!(grains.unit, AngleUnit::Radians);

        let grid = config.grid.as_ref().unwrap();
        assert_eq!(grid.dimensions, GridValue::Values(vec![64, 32]));
        assert_eq!(grid.spacing, GridValue::Path("/Geometry/SPACING".into()));
        assert_eq!(grid.time, Some(GridValue::Values(1.5)));
        assert_eq!(grid.cell_data.len(), 2);
        assert_eq!(grid.cell_data[0].attribute, AttributeType::Vectors);
        assert_eq!(grid.cell_data[1].attribute, AttributeType::Scalars);
        assert_eq!(grid.cell_data[1].tag, None);

        assert_eq!(config.txt.delimiter, Delimiter::Comma);
        assert_eq!(config.txt.precision, Some(4));
        assert!(config.vtk.embed_time);
        assert_eq!(config.vtk.timestep_suffix, "-");
        assert_eq!(config.driving.tags["<phases>"], "2");
        assert_eq!(
            config.output.requested(),
            vec![Artifact::Txt, Artifact::Vtk, Artifact::Driving]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_use_defaults() {
        let config = ConversionConfig::from_str(
            r#"{ "input": "a.json", "dim": 3, "output": {},
                 "vtk": { "columns": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.vtk.columns, 3);
        assert_eq!(config.vtk.field_name, "GrainID");
        assert_eq!(config.txt, TxtOptions::default());
        assert!(config.output.requested().is_empty());
    }

    #[test]
    fn rejects_bad_documents() {
        // unknown key
        assert!(ConversionConfig::from_str(
            r#"{ "input": "a", "dim": 3, "output": {}, "extra": 1 }"#
        )
        .is_err());
        // unsupported dimensionality
        assert!(ConversionConfig::from_str(r#"{ "input": "a", "dim": 4, "output": {} }"#).is_err());
        // missing output
        assert!(ConversionConfig::from_str(r#"{ "input": "a", "dim": 3 }"#).is_err());
    }

    #[test]
    fn cell_data_checked() {
        let config = |entry: &str| {
            ConversionConfig::from_str(&format!(
                r#"{{ "input": "a", "dim": 3, "output": {{ "vtk": "a.vtk" }},
                     "grid": {{ "grain_ids": "/ids", "dimensions": [1, 1, 1],
                               "spacing": [1.0, 1.0, 1.0], "cell_data": [{entry}] }} }}"#
            ))
            .unwrap()
        };

        let field = config(r#"{ "path": "/a", "name": "a", "data_type": "int", "attribute": "FIELD" }"#);
        assert!(matches!(field.validate(), Err(Error::ConfigError(_))));

        let spaced = config(r#"{ "path": "/a", "name": "a b", "data_type": "int" }"#);
        assert!(matches!(spaced.validate(), Err(Error::ConfigError(_))));

        let field = config(
            r#"{ "path": "/a", "name": "a", "data_type": "short", "attribute": "FIELD",
                 "field_array": { "name": "x", "components": 2 } }"#,
        );
        assert!(field.validate().is_ok());

        // unknown attribute
        assert!(ConversionConfig::from_str(
            r#"{ "input": "a", "dim": 3, "output": {},
                 "grid": { "grain_ids": "/ids", "dimensions": [1, 1, 1], "spacing": [1.0, 1.0, 1.0],
                           "cell_data": [{ "path": "/a", "name": "a", "data_type": "int",
                                           "attribute": "COLOR_SCALARS" }] } }"#
        )
        .is_err());
    }

    #[test]
    fn missing_sections_fail_validation() {
        let config = ConversionConfig::from_str(
            r#"{ "input": "a", "dim": 3, "output": { "txt": "a.txt" } }"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }
}
