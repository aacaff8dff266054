//! Small numeric kit shared by the whole pipeline: angle normalization,
//! clamped angular separation, axis rotation matrices, Chebyshev evaluation
//! and the Brent root solver.

pub mod chebyshev;
pub mod root_finding;

use crate::constants::{Degree, Mat3, Radian, Vec3};
use crate::hilal_errors::HilalError;

/// Normalize an angle in degrees to the range `[0, 360)`.
pub fn normalize_deg(angle: Degree) -> Degree {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Normalize an angle in degrees to the range `(-180, 180]`.
pub fn normalize_deg_signed(angle: Degree) -> Degree {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Unit vector in the direction of `v`.
///
/// Return
/// ------
/// * The normalized vector, or [`HilalError::ZeroVector`] for a zero input.
pub fn unit(v: &Vec3) -> Result<Vec3, HilalError> {
    let n = v.norm();
    if n == 0.0 {
        return Err(HilalError::ZeroVector);
    }
    Ok(v / n)
}

/// Angular separation between two direction vectors, in degrees.
///
/// The dot product of the unit vectors is clamped to `[-1, 1]` before the
/// `acos`; without the clamp, rounding pushes nearly-parallel vectors just
/// outside the domain and the result is NaN.
///
/// Arguments
/// ---------
/// * `a`, `b`: direction vectors (any non-zero length, any unit).
///
/// Return
/// ------
/// * Separation in degrees, in `[0, 180]`, or [`HilalError::ZeroVector`].
pub fn angular_separation(a: &Vec3, b: &Vec3) -> Result<Degree, HilalError> {
    let ua = unit(a)?;
    let ub = unit(b)?;
    let cos_sep = ua.dot(&ub).clamp(-1.0, 1.0);
    Ok(cos_sep.acos().to_degrees())
}

/// Construct a rotation matrix around a principal axis (X, Y, or Z).
///
/// This follows the frame-rotation convention used throughout the
/// celestial-to-terrestrial chain: `rotmt(alpha, 2)` maps a vector's
/// components into a frame rotated by `+alpha` around Z. The matrix is
/// orthonormal and satisfies `R^T = R^-1`.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `k`: index of the axis of rotation: `0` → X, `1` → Y, `2` → Z.
///
/// Panics
/// ------
/// * Panics if `k > 2`, as only axes 0-2 (X, Y, Z) are valid.
pub fn rotmt(alpha: Radian, k: usize) -> Mat3 {
    let cosa = alpha.cos();
    let sina = alpha.sin();

    match k {
        0 => Mat3::new(
            1.0, 0.0, 0.0, //
            0.0, cosa, sina, //
            0.0, -sina, cosa,
        ),
        1 => Mat3::new(
            cosa, 0.0, -sina, //
            0.0, 1.0, 0.0, //
            sina, 0.0, cosa,
        ),
        2 => Mat3::new(
            cosa, sina, 0.0, //
            -sina, cosa, 0.0, //
            0.0, 0.0, 1.0,
        ),
        _ => panic!("**** ROTMT: k = ??? ****"),
    }
}
