//! Building the grain table from per-grain arrays

// crate modules
use crate::error::{Error, Result};
use crate::grain::{AngleUnit, Grain};
use crate::rotation::{rotate, Rotation};

// mictools modules
use mictools_format::f;
use mictools_store::{Array, Resolve};

// external crates
use itertools::Itertools;
use log::{debug, info};

/// Extract per-grain phases and orientations into a grain table
///
/// Both arrays are indexed by grain, with row 0 being the background
/// placeholder that DREAM3D writes at the start of every feature array. This
/// row is skipped unless [include_background()](Self::include_background) is
/// set.
///
/// ```rust
/// # use mictools_grains::{GrainTableExtractor, Grain};
/// # use mictools_store::{Array, MemoryStore};
/// let store = MemoryStore::new()
///     .with("/Features/Phases", Array::from_ints(vec![0, 2, 1])).unwrap()
///     .with(
///         "/Features/Euler",
///         Array::from_floats(vec![0.0, 0.0, 0.0, 0.1, 0.2, 0.3, 1.57, 0.0, 3.14])
///             .reshape(vec![3, 3])
///             .unwrap(),
///     ).unwrap();
///
/// let grains = GrainTableExtractor::new()
///     .extract(&store, "/Features/Phases", "/Features/Euler")
///     .unwrap();
///
/// assert_eq!(grains.len(), 2);
/// assert_eq!(grains[0], Grain::new(1, 2, [0.1, 0.2, 0.3]));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GrainTableExtractor {
    /// Keep row 0 as a grain with id 0
    pub include_background: bool,
    /// Optional change of axis system applied to every orientation
    pub rotation: Option<Rotation>,
    /// Unit of the input angles
    pub unit: AngleUnit,
}

impl GrainTableExtractor {
    /// New extractor that skips the background and leaves angles untouched
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep row 0 in the output table
    pub fn include_background(mut self, include: bool) -> Self {
        self.include_background = include;
        self
    }

    /// Re-express every orientation in (or out of) the MICRESS axis system
    pub fn rotation(mut self, rotation: Option<Rotation>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Unit of the input Euler angles, only relevant for rotations
    pub fn unit(mut self, unit: AngleUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Resolve both arrays in `store` and build the grain table
    ///
    /// All validation happens before any [Grain] is constructed, so a failure
    /// never produces a partial table.
    pub fn extract<R: Resolve + ?Sized>(
        &self,
        store: &R,
        phase_path: &str,
        euler_path: &str,
    ) -> Result<Vec<Grain>> {
        let phases = store.resolve(phase_path)?;
        let euler = store.resolve(euler_path)?;
        self.extract_arrays(&phases, phase_path, &euler, euler_path)
    }

    /// Build the grain table from already resolved arrays
    ///
    /// The paths are only used for error messages.
    pub fn extract_arrays(
        &self,
        phases: &Array,
        phase_path: &str,
        euler: &Array,
        euler_path: &str,
    ) -> Result<Vec<Grain>> {
        let n_phases = phase_rows(phases, phase_path)?;
        let n_euler = euler_rows(euler, euler_path)?;

        if n_phases != n_euler {
            return Err(Error::ShapeMismatch(f!(
                "phase array \"{phase_path}\" has {n_phases} rows but euler array \"{euler_path}\" has {n_euler}"
            )));
        }

        if n_phases == 0 {
            return Err(Error::ShapeMismatch(f!(
                "no grains found at \"{phase_path}\""
            )));
        }

        let phase_values = phases.to_i64_vec().ok_or_else(|| Error::TypeMismatch {
            path: phase_path.to_string(),
            expected: "integer phase ids".to_string(),
            found: phases.describe(),
        })?;

        let first = usize::from(!self.include_background);
        let grains = phase_values
            .into_iter()
            .zip(euler.to_f64_vec().into_iter().tuples::<(f64, f64, f64)>())
            .enumerate()
            .skip(first)
            .map(|(id, (phase, (phi1, phi, phi2)))| {
                let angles = match self.rotation {
                    Some(rotation) => rotate([phi1, phi, phi2], self.unit, rotation),
                    None => [phi1, phi, phi2],
                };
                Grain::new(id, phase, angles)
            })
            .collect::<Vec<Grain>>();

        if let Some(rotation) = self.rotation {
            debug!("Rotated orientations {rotation:?}");
        }
        info!("Extracted {} grains", grains.len());
        Ok(grains)
    }
}

/// Convenience wrapper for the default [GrainTableExtractor]
pub fn extract_grains<R: Resolve + ?Sized>(
    store: &R,
    phase_path: &str,
    euler_path: &str,
) -> Result<Vec<Grain>> {
    GrainTableExtractor::new().extract(store, phase_path, euler_path)
}

/// Number of grains in a `(N)` or `(N, 1)` phase array
fn phase_rows(array: &Array, path: &str) -> Result<usize> {
    match array.shape() {
        [n] | [n, 1] => Ok(*n),
        _ => Err(Error::ShapeMismatch(f!(
            "phase array \"{path}\" must have shape (N) or (N, 1), found {}",
            array.describe()
        ))),
    }
}

/// Number of grains in a `(N, 3)` Euler angle array
fn euler_rows(array: &Array, path: &str) -> Result<usize> {
    match array.shape() {
        [n, 3] => Ok(*n),
        _ => Err(Error::ShapeMismatch(f!(
            "euler array \"{path}\" must have shape (N, 3), found {}",
            array.describe()
        ))),
    }
}
