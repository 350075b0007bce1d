//! Re-expressing orientations in the MICRESS axis system
//!
//! MICRESS uses a coordinate system with the y and z axes swapped relative to
//! DREAM3D (xyz → xzy). An orientation given as Bunge z-x-z Euler angles is
//! turned into a rotation matrix, conjugated by the axis swap, and decomposed
//! back into Euler angles.
//!
//! ```rust
//! # use mictools_grains::{rotate, AngleUnit, Rotation};
//! let rotated = rotate([90.0, 0.0, 0.0], AngleUnit::Degrees, Rotation::ToMicress);
//! assert!((rotated[0] - 270.0).abs() < 1e-9);
//! assert!((rotated[1] - 90.0).abs() < 1e-9);
//! assert!((rotated[2] - 90.0).abs() < 1e-9);
//! ```

// standard library
use std::f64::consts::TAU;

// crate modules
use crate::grain::AngleUnit;

// external crates
use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Below this `sin(Phi)` the first and last rotations share an axis
const GIMBAL_TOLERANCE: f64 = 1e-5;

/// Direction of the axis system change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// From the input axes (e.g. DREAM3D) into MICRESS axes
    ToMicress,
    /// From MICRESS axes back to the input axes
    FromMicress,
}

/// Rotate a `[phi1, Phi, phi2]` orientation into or out of MICRESS axes
///
/// Angles are returned in the same `unit` they are given in, with `phi1` and
/// `phi2` in `[0, 2π)` and `Phi` in `[0, π]`.
pub fn rotate(euler: [f64; 3], unit: AngleUnit, rotation: Rotation) -> [f64; 3] {
    let [phi1, phi, phi2] = euler.map(|a| unit.to_radians(a));

    let (to_micress, from_micress) = axis_swaps();
    let (pre, post) = match rotation {
        Rotation::ToMicress => (from_micress, to_micress),
        Rotation::FromMicress => (to_micress, from_micress),
    };

    let matrix = pre * euler_matrix(phi1, phi, phi2) * post;
    decompose(&matrix).map(|a| unit.from_radians(a))
}

/// The xyz → xzy axis swap and its inverse
fn axis_swaps() -> (Matrix3<f64>, Matrix3<f64>) {
    #[rustfmt::skip]
    let to_micress = Matrix3::new(
        1.0,  0.0, 0.0,
        0.0,  0.0, 1.0,
        0.0, -1.0, 0.0,
    );
    (to_micress, to_micress.transpose())
}

/// Rotation matrix for Bunge z-x-z Euler angles in radians
fn euler_matrix(phi1: f64, phi: f64, phi2: f64) -> Matrix3<f64> {
    let z1 = Rotation3::from_axis_angle(&Vector3::z_axis(), phi1);
    let x = Rotation3::from_axis_angle(&Vector3::x_axis(), phi);
    let z2 = Rotation3::from_axis_angle(&Vector3::z_axis(), phi2);
    (z1 * x * z2).into_inner()
}

/// Euler angles in radians from a z-x-z rotation matrix
fn decompose(r: &Matrix3<f64>) -> [f64; 3] {
    let phi = r[(2, 2)].clamp(-1.0, 1.0).acos();

    let (phi1, phi2) = if phi.sin().abs() < GIMBAL_TOLERANCE {
        // only the combined z rotation is defined, put it all in phi1
        (r[(1, 0)].atan2(r[(0, 0)]), 0.0)
    } else {
        (r[(0, 2)].atan2(-r[(1, 2)]), r[(2, 0)].atan2(r[(2, 1)]))
    };

    [wrap(phi1), phi, wrap(phi2)]
}

/// Map an angle in radians onto `[0, 2π)`
fn wrap(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_is_unchanged() {
        let rotated = rotate([0.0, 0.0, 0.0], AngleUnit::Degrees, Rotation::ToMicress);
        assert_close(rotated, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn x_rotation_is_unchanged() {
        let rotated = rotate([0.0, 90.0, 0.0], AngleUnit::Degrees, Rotation::ToMicress);
        assert_close(rotated, [0.0, 90.0, 0.0]);
    }

    #[test]
    fn round_trip_through_micress_axes() {
        for euler in [[30.0, 40.0, 50.0], [200.0, 120.0, 10.0], [5.0, 170.0, 300.0]] {
            let there = rotate(euler, AngleUnit::Degrees, Rotation::ToMicress);
            let back = rotate(there, AngleUnit::Degrees, Rotation::FromMicress);
            assert_close(back, euler);
        }
    }

    #[test]
    fn radians_in_radians_out() {
        let degrees = rotate([90.0, 0.0, 0.0], AngleUnit::Degrees, Rotation::ToMicress);
        let radians = rotate(
            [90f64.to_radians(), 0.0, 0.0],
            AngleUnit::Radians,
            Rotation::ToMicress,
        );
        assert_close(radians, degrees.map(f64::to_radians));
    }

    #[test]
    fn gimbal_lock_folds_into_phi1() {
        // Phi = 0 means phi1 and phi2 rotate about the same axis
        let angles = decompose(&euler_matrix(0.3, 0.0, 0.4));
        assert_close(angles, [0.7, 0.0, 0.0]);
    }

    #[test]
    fn wrap_negative_angles() {
        assert!((wrap(-std::f64::consts::FRAC_PI_2) - 1.5 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(wrap(0.0), 0.0);
    }
}
