//! Extra per-cell arrays written next to the grain ids

// crate modules
use crate::error::{Error, Result};
use crate::vtk::VtkDataType;

// mictools modules
use mictools_format::f;
use mictools_store::{ArrayData, Resolve};

// external crates
use log::debug;
use serde::{Deserialize, Serialize};

/// Legacy VTK dataset attribute an array is written as
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeType {
    /// One to four values per cell with a lookup table
    #[default]
    Scalars,
    /// Three values per cell
    Vectors,
    /// Three values per cell, of unit length
    Normals,
    /// Nine values per cell
    Tensors,
    /// Named arrays with any number of components, grouped by field name
    Field,
}

impl AttributeType {
    /// Keyword starting the block in a legacy file
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Scalars => "SCALARS",
            Self::Vectors => "VECTORS",
            Self::Normals => "NORMALS",
            Self::Tensors => "TENSORS",
            Self::Field => "FIELD",
        }
    }

    /// Fixed number of components per cell, if the attribute has one
    pub fn fixed_components(&self) -> Option<usize> {
        match self {
            Self::Vectors | Self::Normals => Some(3),
            Self::Tensors => Some(9),
            Self::Scalars | Self::Field => None,
        }
    }
}

/// Name and width of one array inside a `FIELD` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldArray {
    /// Array name inside the field
    pub name: String,
    /// Values per cell
    pub components: usize,
}

/// Where to find an extra cell array and how to write it
///
/// ```rust
/// # use mictools_voxels::{AttributeType, CellDataSpec};
/// let spec: CellDataSpec = serde_json::from_str(r#"{
///     "path": "/CellData/EulerAngles",
///     "name": "euler",
///     "data_type": "float",
///     "attribute": "VECTORS",
///     "tag": "<euler-angles>"
/// }"#).unwrap();
///
/// assert_eq!(spec.attribute, AttributeType::Vectors);
/// assert_eq!(spec.reference(), "euler");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellDataSpec {
    /// Logical path of the array in the input
    pub path: String,
    /// Data name in the VTK file
    pub name: String,
    /// Type name, integer types need whole-number values
    pub data_type: VtkDataType,
    /// Dataset attribute the array is written as
    #[serde(default)]
    pub attribute: AttributeType,
    /// Array name and width, required for [AttributeType::Field]
    #[serde(default)]
    pub field_array: Option<FieldArray>,
    /// Driving file tag replaced with `<vtk path> <reference>`
    #[serde(default)]
    pub tag: Option<String>,
}

impl CellDataSpec {
    /// Names identifying the array in a driving file
    ///
    /// The data name, followed by the array name for fields.
    pub fn reference(&self) -> String {
        match &self.field_array {
            Some(array) if self.attribute == AttributeType::Field => {
                f!("{} {}", self.name, array.name)
            }
            _ => self.name.clone(),
        }
    }

    /// Resolve the array and check that it fills `n_cells` cells
    pub fn load<R: Resolve + ?Sized>(&self, store: &R, n_cells: usize) -> Result<CellArray> {
        let array = store.resolve(&self.path)?;

        let components = match (self.attribute, &self.field_array) {
            (AttributeType::Field, Some(field)) if field.components > 0 => field.components,
            (AttributeType::Field, _) => {
                return Err(Error::InvalidOptions(f!(
                    "FIELD array \"{}\" needs a field_array with at least one component",
                    self.name
                )))
            }
            (attribute, _) => attribute
                .fixed_components()
                .unwrap_or_else(|| scalar_components(array.len(), n_cells)),
        };

        let values = if self.data_type.is_integer() {
            ArrayData::Int(array.to_i64_vec().ok_or_else(|| Error::TypeMismatch {
                path: self.path.clone(),
                expected: f!("whole numbers for {}", self.data_type),
                found: array.describe(),
            })?)
        } else {
            ArrayData::Float(array.to_f64_vec())
        };

        debug!(
            "Cell data \"{}\" from \"{}\" with {components} component(s)",
            self.name, self.path
        );

        CellArray {
            name: self.name.clone(),
            data_type: self.data_type,
            attribute: self.attribute,
            components,
            field_array: self.field_array.as_ref().map(|a| a.name.clone()),
            values,
        }
        .checked(n_cells)
    }
}

/// Components of a scalar array, one unless the length says two to four
fn scalar_components(len: usize, n_cells: usize) -> usize {
    match len.checked_div(n_cells) {
        Some(c @ 2..=4) if len % n_cells == 0 => c,
        _ => 1,
    }
}

/// An extra per-cell array ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    /// Data name in the VTK file
    pub name: String,
    /// Type name written after the data name
    pub data_type: VtkDataType,
    /// Dataset attribute the array is written as
    pub attribute: AttributeType,
    /// Values per cell
    pub components: usize,
    /// Array name inside a `FIELD` block
    pub field_array: Option<String>,
    /// Every value, cell by cell with components innermost
    pub values: ArrayData,
}

impl CellArray {
    /// Number of cells the values cover
    pub fn n_tuples(&self) -> usize {
        self.values.len() / self.components.max(1)
    }

    /// Fail unless the values fill exactly `n_cells` cells
    pub fn checked(self, n_cells: usize) -> Result<Self> {
        let expected = n_cells.checked_mul(self.components).ok_or_else(|| {
            Error::Dimensionality(f!(
                "{n_cells} cells of {} components cannot be addressed",
                self.components
            ))
        })?;

        if self.components == 0 || self.values.len() != expected {
            return Err(Error::CellDataMismatch {
                name: self.name,
                expected,
                found: self.values.len(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mictools_store::{Array, MemoryStore};

    fn spec(attribute: AttributeType, data_type: VtkDataType) -> CellDataSpec {
        CellDataSpec {
            path: "/values".into(),
            name: "values".into(),
            data_type,
            attribute,
            field_array: None,
            tag: None,
        }
    }

    fn store(values: Vec<f64>) -> MemoryStore {
        MemoryStore::new()
            .with("/values", Array::from_floats(values))
            .unwrap()
    }

    #[test]
    fn vectors_need_three_components() {
        let store = store((0..12).map(f64::from).collect());
        let array = spec(AttributeType::Vectors, VtkDataType::Float)
            .load(&store, 4)
            .unwrap();
        assert_eq!(array.components, 3);
        assert_eq!(array.n_tuples(), 4);

        let result = spec(AttributeType::Tensors, VtkDataType::Float).load(&store, 4);
        assert!(matches!(
            result,
            Err(Error::CellDataMismatch {
                expected: 36,
                found: 12,
                ..
            })
        ));
    }

    #[test]
    fn scalar_components_from_length() {
        assert_eq!(scalar_components(8, 4), 2);
        assert_eq!(scalar_components(4, 4), 1);
        assert_eq!(scalar_components(20, 4), 1);
        assert_eq!(scalar_components(7, 4), 1);
        assert_eq!(scalar_components(3, 0), 1);
    }

    #[test]
    fn integer_types_reject_fractions() {
        let store = store(vec![1.0, 2.5]);
        let result = spec(AttributeType::Scalars, VtkDataType::Int).load(&store, 2);
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));

        let array = spec(AttributeType::Scalars, VtkDataType::Double)
            .load(&store, 2)
            .unwrap();
        assert_eq!(array.values, ArrayData::Float(vec![1.0, 2.5]));
    }

    #[test]
    fn fields_need_an_array() {
        let store = store(vec![1.0, 2.0, 3.0, 4.0]);
        let mut field = spec(AttributeType::Field, VtkDataType::Float);
        assert!(matches!(
            field.load(&store, 2),
            Err(Error::InvalidOptions(_))
        ));

        field.field_array = Some(FieldArray {
            name: "pair".into(),
            components: 2,
        });
        let array = field.load(&store, 2).unwrap();
        assert_eq!(array.field_array.as_deref(), Some("pair"));
        assert_eq!(field.reference(), "values pair");
    }
}
