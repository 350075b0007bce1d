//! MICRESS driving file generation from a tagged template

// standard library
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};

// mictools modules
use mictools_format::{f, NumFormat};
use mictools_voxels::{Dimensionality, VoxelGrid};

// external crates
use log::{debug, info, warn};

/// Tags for the cell counts along x, y and z
pub const TAG_CELLS: [&str; 3] = ["<cellsX>", "<cellsY>", "<cellsZ>"];
/// Tag for the cell size
pub const TAG_SPACING: &str = "<spacing>";
/// Tag for the grain property table
pub const TAG_GRAIN_PROPERTIES: &str = "<grain-properties>";
/// Tag for the structured points file and its field name
pub const TAG_GRAIN_STRUCTURE: &str = "<grain-structure>";

/// Values substituted into a driving file template
///
/// Grid values come from the converted [VoxelGrid], file references from the
/// outputs actually written in the same run.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingContext {
    /// Cell counts along x, y and z
    pub dimensions: [usize; 3],
    /// Number of axes with a `<cells*>` tag
    pub dimensionality: Dimensionality,
    /// Cell size, MICRESS cells are cubic
    pub spacing: f64,
    /// Grain property table, if one was written
    pub grain_properties: Option<PathBuf>,
    /// Structured points file and the field holding grain ids
    pub grain_structure: Option<(PathBuf, String)>,
    /// Tag and data name of each extra cell array in the structure file
    pub cell_data: Vec<(String, String)>,
    /// Further `<tag>` to text replacements
    pub tags: BTreeMap<String, String>,
    /// Insert absolute paths for file references
    pub absolute_paths: bool,
}

impl DrivingContext {
    /// Context for a converted grid without any file references
    pub fn new(grid: &VoxelGrid, dimensionality: Dimensionality) -> Self {
        Self {
            dimensions: grid.dimensions,
            dimensionality,
            spacing: grid.spacing[0],
            grain_properties: None,
            grain_structure: None,
            cell_data: Vec::new(),
            tags: BTreeMap::new(),
            absolute_paths: false,
        }
    }

    /// Reference a grain property table
    pub fn grain_properties(mut self, path: Option<PathBuf>) -> Self {
        self.grain_properties = path;
        self
    }

    /// Reference a structured points file and field
    pub fn grain_structure(mut self, structure: Option<(PathBuf, String)>) -> Self {
        self.grain_structure = structure;
        self
    }

    /// Reference extra cell arrays by `(tag, data name)`
    ///
    /// Each tag is replaced with `<vtk path> <data name>` once a structure
    /// file is referenced.
    pub fn cell_data(mut self, cell_data: Vec<(String, String)>) -> Self {
        self.cell_data = cell_data;
        self
    }

    /// Add user defined replacements
    pub fn tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    /// Choose whether file references are made absolute
    pub fn absolute_paths(mut self, absolute: bool) -> Self {
        self.absolute_paths = absolute;
        self
    }

    /// Every replacement in the order applied
    fn replacements(&self) -> Result<Vec<(String, String)>> {
        let mut replacements = TAG_CELLS
            .iter()
            .zip(self.dimensions)
            .take(self.dimensionality.axes())
            .map(|(tag, n)| (tag.to_string(), n.to_string()))
            .collect::<Vec<(String, String)>>();

        replacements.push((TAG_SPACING.to_string(), self.spacing.decimal(None)));

        if let Some(path) = &self.grain_properties {
            replacements.push((TAG_GRAIN_PROPERTIES.to_string(), self.reference(path)?));
        }

        if let Some((path, field)) = &self.grain_structure {
            let reference = self.reference(path)?;
            replacements.push((TAG_GRAIN_STRUCTURE.to_string(), f!("{reference} {field}")));
            for (tag, names) in &self.cell_data {
                replacements.push((tag.clone(), f!("{reference} {names}")));
            }
        } else if !self.cell_data.is_empty() {
            warn!("No structure file to reference, cell data tags are left as they are");
        }

        for (tag, value) in &self.tags {
            if !is_tag(tag) {
                warn!("Tag {tag:?} does not follow the recommended \"<name>\" form");
            }
            replacements.push((tag.clone(), value.clone()));
        }

        Ok(replacements)
    }

    /// Path text for a referenced output, which must already exist
    fn reference(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(Error::TemplateError(f!(
                "referenced output {} was not found",
                path.display()
            )));
        }

        let path = if self.absolute_paths {
            fs::canonicalize(path)?
        } else {
            path.to_path_buf()
        };
        Ok(path.display().to_string())
    }
}

/// Replace every known tag in `template`
///
/// Tags missing from the template only produce a warning. An empty template
/// or a referenced output that does not exist is an error.
///
/// ```rust
/// # use mictools_convert::{render_driving, DrivingContext};
/// # use mictools_voxels::{Dimensionality, VoxelGrid};
/// let grid = VoxelGrid::new([4, 2, 1], [0.5, 0.5, 0.5], vec![1; 8]).unwrap();
/// let context = DrivingContext::new(&grid, Dimensionality::Two);
///
/// let text = render_driving("<cellsX> <cellsY>\n<spacing>\n", &context).unwrap();
/// assert_eq!(text, "4 2\n0.5\n");
/// ```
pub fn render_driving(template: &str, context: &DrivingContext) -> Result<String> {
    if template.trim().is_empty() {
        return Err(Error::TemplateError("template is empty".to_string()));
    }

    let mut text = template.to_string();
    for (tag, value) in context.replacements()? {
        if text.contains(&tag) {
            debug!("Replacing {tag} with {value:?}");
            text = text.replace(&tag, &value);
        } else {
            warn!("Driving file template is missing tag {tag}");
        }
    }

    Ok(text)
}

/// Read a template, replace its tags and write the driving file
pub fn write_driving<P, Q>(template: P, destination: Q, context: &DrivingContext) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template = template.as_ref();
    let destination = destination.as_ref();

    let text = fs::read_to_string(template).map_err(|e| {
        Error::TemplateError(f!("could not read {}: {e}", template.display()))
    })?;

    let rendered = render_driving(&text, context)?;
    fs::write(destination, rendered)?;

    info!("Written driving file to {destination:?}");
    Ok(destination.to_path_buf())
}

/// True for text of the form `<name>`
fn is_tag(tag: &str) -> bool {
    tag.len() > 2 && tag.starts_with('<') && tag.ends_with('>')
}
