//! Store backed by a JSON document
//!
//! Objects are groups and numeric values are datasets. Nested arrays become
//! n-dimensional arrays, provided they are rectangular.
//!
//! ```json
//! {
//!     "CellFeatureData": {
//!         "Phases": [[0], [1], [2]],
//!         "EulerAngles": [[0.0, 0.0, 0.0], [0.1, 0.2, 0.3], [1.57, 0.0, 3.14]]
//!     },
//!     "Time": 1.5
//! }
//! ```

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// crate modules
use crate::array::{Array, ArrayData};
use crate::error::{Error, Result};
use crate::resolve::{normalise_path, split_path, Node, Resolve};

// mictools modules
use mictools_format::f;

// external crates
use log::info;
use serde_json::{Number, Value};

/// A hierarchical store backed by a JSON document
#[derive(Debug, Clone, PartialEq)]
pub struct JsonStore {
    root: Value,
}

impl JsonStore {
    /// Read a JSON document from `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading {path:?}");
        let reader = BufReader::new(File::open(path)?);
        Ok(Self {
            root: serde_json::from_reader(reader)?,
        })
    }

    /// Wrap an already parsed document
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }
}

impl std::str::FromStr for JsonStore {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self {
            root: serde_json::from_str(s)?,
        })
    }
}

impl Resolve for JsonStore {
    fn node(&self, path: &str) -> Result<Node> {
        let mut value = &self.root;
        for part in split_path(path) {
            value = match value {
                Value::Object(map) => map.get(part),
                _ => None,
            }
            .ok_or_else(|| Error::PathNotFound {
                path: normalise_path(path),
            })?;
        }

        match value {
            Value::Object(map) => {
                let mut names = map.keys().cloned().collect::<Vec<String>>();
                names.sort();
                Ok(Node::Group(names))
            }
            _ => Ok(Node::Dataset(to_array(path, value)?)),
        }
    }
}

/// Convert a number or rectangular nested array of numbers to an [Array]
fn to_array(path: &str, value: &Value) -> Result<Array> {
    let mismatch = |found: String| Error::TypeMismatch {
        path: normalise_path(path),
        expected: "numeric array".to_string(),
        found,
    };

    // infer the shape from the first element at every depth
    let mut shape = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }

    let mut numbers = Vec::with_capacity(shape.iter().product());
    flatten(value, &shape, &mut numbers).map_err(mismatch)?;

    let data = if numbers.iter().all(|n| n.is_i64()) {
        ArrayData::Int(numbers.iter().filter_map(|n| n.as_i64()).collect())
    } else {
        ArrayData::Float(numbers.iter().filter_map(|n| n.as_f64()).collect())
    };

    Array::new(shape, data)
}

/// Collect numbers depth first, checking every level against `shape`
fn flatten<'a>(
    value: &'a Value,
    shape: &[usize],
    numbers: &mut Vec<&'a Number>,
) -> core::result::Result<(), String> {
    match (value, shape.split_first()) {
        (Value::Number(n), None) => {
            numbers.push(n);
            Ok(())
        }
        (Value::Array(items), Some((len, inner))) => {
            if items.len() != *len {
                return Err(f!(
                    "ragged array (expected length {len}, found {})",
                    items.len()
                ));
            }
            items
                .iter()
                .try_for_each(|item| flatten(item, inner, numbers))
        }
        (Value::Array(_), None) | (Value::Number(_), Some(_)) => {
            Err("ragged array (inconsistent nesting depth)".to_string())
        }
        (other, _) => Err(kind_of(other).to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "group",
    }
}
