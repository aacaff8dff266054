//! Chebyshev record decoding and evaluation for SPK types 2 and 3.
//!
//! A record covers one time sub-interval: a midpoint, a half-width, and
//! `degree+1` coefficients per component. Type 2 stores the three position
//! components and differentiates for velocity; type 3 stores six arrays and
//! the velocity is read off the second triplet directly.

use nom::number::complete::f64 as nom_f64;
use nom::number::Endianness;
use nom::IResult;

use crate::constants::Vec3;
use crate::hilal_errors::HilalError;
use crate::math::chebyshev::{clenshaw, clenshaw_with_derivative};
use crate::spk::summary::SpkSegment;

/// One decoded Chebyshev record.
///
/// Coefficients are kept in one contiguous array, component-major: all X
/// coefficients, then Y, then Z (then the velocity triplet for type 3).
#[derive(Debug, Clone, PartialEq)]
pub struct ChebRecord {
    /// Interval midpoint, ET seconds past J2000 TDB.
    pub mid: f64,
    /// Interval half-width in seconds; strictly positive.
    pub radius: f64,
    /// `n_components * n_coefficients` doubles.
    pub coeffs: Vec<f64>,
}

impl ChebRecord {
    /// Decode the record of `segment` covering `et` from the kernel buffer.
    pub fn decode(
        buffer: &[u8],
        endianness: Endianness,
        segment: &SpkSegment,
        et: f64,
    ) -> Result<ChebRecord, HilalError> {
        let idx = segment.record_index(et);
        let offset = segment.record_offset(idx);
        let n_doubles = segment.directory.rsize;
        let end = offset + n_doubles * 8;
        if end > buffer.len() {
            return Err(HilalError::KernelParse(format!(
                "record {idx} of segment ({}, {}) is outside the file",
                segment.target, segment.center
            )));
        }

        let mut input = &buffer[offset..end];
        let mut read = || -> Result<f64, HilalError> {
            let parsed: IResult<&[u8], f64> = nom_f64(endianness)(input);
            let (rest, value) =
                parsed.map_err(|e| HilalError::KernelParse(format!("chebyshev record: {e}")))?;
            input = rest;
            Ok(value)
        };

        let mid = read()?;
        let radius = read()?;
        if radius <= 0.0 {
            return Err(HilalError::KernelParse(format!(
                "record {idx} of segment ({}, {}) has radius {radius}",
                segment.target, segment.center
            )));
        }

        let mut coeffs = Vec::with_capacity(n_doubles - 2);
        for _ in 0..n_doubles - 2 {
            coeffs.push(read()?);
        }

        Ok(ChebRecord { mid, radius, coeffs })
    }

    /// Normalized time in `[-1, 1]` for an epoch inside the record span.
    fn normalized(&self, et: f64) -> f64 {
        ((et - self.mid) / self.radius).clamp(-1.0, 1.0)
    }

    /// Evaluate a type 2 record: position in km, velocity in km/s from the
    /// derivative of the position polynomials rescaled by `1/radius`.
    pub fn evaluate_type2(&self, et: f64, n_coeff: usize) -> (Vec3, Vec3) {
        let x = self.normalized(et);
        let mut position = Vec3::zeros();
        let mut velocity = Vec3::zeros();
        for axis in 0..3 {
            let c = &self.coeffs[axis * n_coeff..(axis + 1) * n_coeff];
            let (value, derivative) = clenshaw_with_derivative(c, x);
            position[axis] = value;
            velocity[axis] = derivative / self.radius;
        }
        (position, velocity)
    }

    /// Evaluate a type 3 record: position from the first coefficient
    /// triplet, velocity from the *value* of the second triplet (km/s
    /// directly, not a derivative).
    //
    // NAIF's reference divides some type 3 variants by a time-scale factor;
    // cross-check against SPICE before trusting new type 3 kernels.
    pub fn evaluate_type3(&self, et: f64, n_coeff: usize) -> (Vec3, Vec3) {
        let x = self.normalized(et);
        let mut position = Vec3::zeros();
        let mut velocity = Vec3::zeros();
        for axis in 0..3 {
            let cp = &self.coeffs[axis * n_coeff..(axis + 1) * n_coeff];
            position[axis] = clenshaw(cp, x);
            let cv = &self.coeffs[(axis + 3) * n_coeff..(axis + 4) * n_coeff];
            velocity[axis] = clenshaw(cv, x);
        }
        (position, velocity)
    }
}
