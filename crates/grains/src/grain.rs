//! Module for grain-related data and implementations

// external crates
use serde::{Deserialize, Serialize};

/// Representation of a single grain in the microstructure
///
/// The `id` matches the row index into the per-grain arrays of the input, so
/// the background row 0 of a DREAM3D feature table never becomes a real grain.
///
/// Orientations are Bunge `(phi1, Phi, phi2)` Euler angles in whatever unit
/// the input uses. Values are carried through untouched unless a
/// [Rotation](crate::Rotation) is requested.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Grain {
    /// Grain id, 1-based
    pub id: usize,
    /// Phase identifier
    pub phase: i64,
    /// Euler angles `[phi1, Phi, phi2]`
    pub euler: [f64; 3],
}

impl Grain {
    /// Create a grain from its parts
    ///
    /// ```rust
    /// # use mictools_grains::Grain;
    /// let grain = Grain::new(1, 2, [0.1, 0.2, 0.3]);
    /// assert_eq!(grain.euler[1], 0.2);
    /// ```
    pub fn new(id: usize, phase: i64, euler: [f64; 3]) -> Self {
        Self { id, phase, euler }
    }
}

impl std::fmt::Display for Grain {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Grain {} (phase {}): {} {} {}",
            self.id, self.phase, self.euler[0], self.euler[1], self.euler[2]
        )
    }
}

/// Unit of the Euler angles in the input
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    /// Degrees, as written by DREAM3D exports for MICRESS
    #[default]
    Degrees,
    /// Radians
    Radians,
}

impl AngleUnit {
    /// Convert a value in this unit to radians
    pub fn to_radians(&self, value: f64) -> f64 {
        match self {
            Self::Degrees => value.to_radians(),
            Self::Radians => value,
        }
    }

    /// Convert a value in radians to this unit
    pub fn from_radians(&self, value: f64) -> f64 {
        match self {
            Self::Degrees => value.to_degrees(),
            Self::Radians => value,
        }
    }
}
