//! Bennett's refraction formula with pressure/temperature scaling.
//!
//! Bennett (1982) fits the refraction of visible light at the horizon to
//! about 0.07 arcminutes, which is far below the minute-level uncertainty
//! of actual near-horizon refraction on any given evening.

use crate::constants::Degree;

/// Standard pressure used as the scaling reference, millibars.
const REFERENCE_PRESSURE: f64 = 1010.0;

/// Refraction in degrees for a geometric altitude.
///
/// Arguments
/// ---------
/// * `altitude`: airless (geometric) altitude in degrees.
/// * `pressure`: station pressure in millibars.
/// * `temperature`: air temperature in Celsius.
///
/// Return
/// ------
/// * Bennett's `cot(h + 7.31/(h + 4.4)) / 60`, scaled by
///   `(P/1010) * (283/(273+T))`; zero below -1 degree where the fit has no
///   meaning.
pub fn bennett_refraction(altitude: Degree, pressure: f64, temperature: f64) -> Degree {
    if altitude < -1.0 {
        return 0.0;
    }
    let arg = (altitude + 7.31 / (altitude + 4.4)).to_radians();
    let refraction_arcmin = 1.0 / arg.tan();
    let scale = (pressure / REFERENCE_PRESSURE) * (283.0 / (273.0 + temperature));
    refraction_arcmin / 60.0 * scale
}

/// Apparent altitude: geometric altitude lifted by refraction.
pub fn apply_refraction(altitude: Degree, pressure: f64, temperature: f64) -> Degree {
    altitude + bennett_refraction(altitude, pressure, temperature)
}

/// Invert [`apply_refraction`] by fixed-point iteration.
///
/// Four rounds of `h <- h_app - R(h)` bring the residual below 0.01
/// arcseconds for positive altitudes.
pub fn remove_refraction(apparent: Degree, pressure: f64, temperature: f64) -> Degree {
    let mut altitude = apparent;
    for _ in 0..4 {
        altitude = apparent - bennett_refraction(altitude, pressure, temperature);
    }
    altitude
}
