//! WGS84 geodetic conversions and the local east-north-up frame.

use crate::constants::{
    Degree, Meter, Vec3, EARTH_ECC_SQUARED, EARTH_MAJOR_AXIS,
};
use crate::math::normalize_deg;

/// Prime-vertical radius of curvature N(phi) in meters.
fn prime_vertical_radius(sin_lat: f64) -> f64 {
    EARTH_MAJOR_AXIS / (1.0 - EARTH_ECC_SQUARED * sin_lat * sin_lat).sqrt()
}

/// Geodetic coordinates to Earth-centered Earth-fixed, in meters.
///
/// Arguments
/// ---------
/// * `lat`: geodetic latitude in degrees, north positive.
/// * `lon`: longitude in degrees, east positive.
/// * `height`: height above the WGS84 ellipsoid in meters.
pub fn geodetic_to_ecef(lat: Degree, lon: Degree, height: Meter) -> Vec3 {
    let phi = lat.to_radians();
    let lam = lon.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_lam, cos_lam) = lam.sin_cos();
    let n = prime_vertical_radius(sin_phi);

    Vec3::new(
        (n + height) * cos_phi * cos_lam,
        (n + height) * cos_phi * sin_lam,
        (n * (1.0 - EARTH_ECC_SQUARED) + height) * sin_phi,
    )
}

/// ECEF (meters) back to geodetic coordinates by Bowring iteration.
///
/// Return
/// ------
/// * `(lat_deg, lon_deg, height_m)`. Sub-millimeter against
///   [`geodetic_to_ecef`] for latitudes below 89.9 degrees.
pub fn ecef_to_geodetic(ecef: &Vec3) -> (Degree, Degree, Meter) {
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let lon = ecef.y.atan2(ecef.x);

    let mut phi = ecef.z.atan2(p * (1.0 - EARTH_ECC_SQUARED));
    for _ in 0..4 {
        let n = prime_vertical_radius(phi.sin());
        phi = (ecef.z + EARTH_ECC_SQUARED * n * phi.sin()).atan2(p);
    }

    let n = prime_vertical_radius(phi.sin());
    let height = p / phi.cos() - n;

    (phi.to_degrees(), lon.to_degrees(), height)
}

/// Orthonormal east / north / up basis at a geodetic location.
pub fn enu_basis(lat: Degree, lon: Degree) -> (Vec3, Vec3, Vec3) {
    let phi = lat.to_radians();
    let lam = lon.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_lam, cos_lam) = lam.sin_cos();

    let east = Vec3::new(-sin_lam, cos_lam, 0.0);
    let north = Vec3::new(-sin_phi * cos_lam, -sin_phi * sin_lam, cos_phi);
    let up = Vec3::new(cos_phi * cos_lam, cos_phi * sin_lam, sin_phi);
    (east, north, up)
}

/// Project an ECEF displacement onto the local ENU axes.
pub fn ecef_to_enu(delta: &Vec3, lat: Degree, lon: Degree) -> Vec3 {
    let (east, north, up) = enu_basis(lat, lon);
    Vec3::new(delta.dot(&east), delta.dot(&north), delta.dot(&up))
}

/// Azimuth/altitude of an ENU direction.
///
/// Return
/// ------
/// * `(azimuth, altitude)` in degrees; azimuth measured from north
///   through east, normalized to `[0, 360)`.
pub fn enu_to_az_alt(enu: &Vec3) -> (Degree, Degree) {
    let azimuth = normalize_deg(enu.x.atan2(enu.y).to_degrees());
    let horizontal = (enu.x * enu.x + enu.y * enu.y).sqrt();
    let altitude = enu.z.atan2(horizontal).to_degrees();
    (azimuth, altitude)
}
