//! Module for the numeric array type returned by every store

// crate modules
use crate::error::{Error, Result};

// mictools modules
use mictools_format::f;

/// Flat element storage of an [Array]
///
/// Hierarchical formats carry many integer and floating point widths. These
/// are widened to `i64` and `f64` on the way in, which is lossless for every
/// type DREAM3D and MICRESS write.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// Any signed or unsigned integer type
    Int(Vec<i64>),
    /// Any floating point type
    Float(Vec<f64>),
}

impl ArrayData {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            Self::Int(values) => values.len(),
            Self::Float(values) => values.len(),
        }
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the element kind for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
        }
    }
}

/// A dense n-dimensional numeric array
///
/// Elements are stored row-major (C order), so the last axis varies fastest.
/// A DREAM3D cell array of shape `(nz, ny, nx, 1)` is therefore already in
/// x-fastest voxel order when read flat.
///
/// ```rust
/// # use mictools_store::{Array, ArrayData};
/// let array = Array::new(vec![2, 3], ArrayData::Int(vec![1, 2, 3, 4, 5, 6])).unwrap();
/// assert_eq!(array.leading_len(), 2);
/// assert_eq!(array.len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    shape: Vec<usize>,
    data: ArrayData,
}

impl Array {
    /// Create a new array, checking that the data fills the shape exactly
    pub fn new(shape: Vec<usize>, data: ArrayData) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::InvalidShape {
                shape,
                length: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// One dimensional integer array
    pub fn from_ints(values: Vec<i64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: ArrayData::Int(values),
        }
    }

    /// One dimensional floating point array
    pub fn from_floats(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: ArrayData::Float(values),
        }
    }

    /// Reinterpret the same flat data with another shape
    pub fn reshape(self, shape: Vec<usize>) -> Result<Self> {
        Self::new(shape, self.data)
    }

    /// Length of every axis
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the first axis, or 1 for a scalar
    pub fn leading_len(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Flat element storage
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// True for integer element storage
    pub fn is_integer(&self) -> bool {
        matches!(self.data, ArrayData::Int(_))
    }

    /// Every element as `f64`
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.data {
            ArrayData::Int(values) => values.iter().map(|v| *v as f64).collect(),
            ArrayData::Float(values) => values.clone(),
        }
    }

    /// Every element as `i64`
    ///
    /// Floating point data is accepted only if every value is a whole number,
    /// since some writers store integer ids as floats. Returns `None`
    /// otherwise.
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match &self.data {
            ArrayData::Int(values) => Some(values.clone()),
            ArrayData::Float(values) => values
                .iter()
                .map(|v| {
                    if v.is_finite() && v.fract() == 0.0 {
                        Some(*v as i64)
                    } else {
                        None
                    }
                })
                .collect(),
        }
    }

    /// Split along the first axis into one array per index
    ///
    /// ```rust
    /// # use mictools_store::{Array, ArrayData};
    /// let array = Array::new(vec![2, 2], ArrayData::Int(vec![1, 2, 3, 4])).unwrap();
    /// let rows = array.split_leading();
    /// assert_eq!(rows[1], Array::from_ints(vec![3, 4]));
    /// ```
    pub fn split_leading(&self) -> Vec<Array> {
        let n = self.leading_len();
        let inner_shape = self.shape.iter().skip(1).copied().collect::<Vec<usize>>();
        let stride: usize = inner_shape.iter().product();

        (0..n)
            .map(|i| {
                let range = i * stride..(i + 1) * stride;
                let data = match &self.data {
                    ArrayData::Int(values) => ArrayData::Int(values[range].to_vec()),
                    ArrayData::Float(values) => ArrayData::Float(values[range].to_vec()),
                };
                Array {
                    shape: inner_shape.clone(),
                    data,
                }
            })
            .collect()
    }

    /// Short description used in error messages, e.g. `float array (6, 3)`
    pub fn describe(&self) -> String {
        let dims = self
            .shape
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        f!("{} array ({dims})", self.data.kind())
    }
}
