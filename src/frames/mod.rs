//! Celestial-to-terrestrial transformation: `ITRS = W * R * Q * GCRS`.
//!
//! Q is the celestial motion matrix built from the CIP coordinates and the
//! CIO locator (IAU 2006 precession + IAU 2000B nutation), R the Earth
//! Rotation Angle about the CIP, W the polar motion. The inverse goes
//! through explicit transposes; the code never relies on orthonormality
//! being exact to skip them.

pub mod cio;
pub mod nutation;

pub use cio::{
    celestial_matrix, cio_locator_s, cip_xy, earth_rotation_angle, earth_rotation_matrix,
    mean_obliquity, polar_motion_matrix,
};
pub use nutation::{fundamental_arguments, nutation_iau2000b};

use crate::constants::{Mat3, Radian, Vec3};
use crate::time_scales::TimeScales;

/// Full GCRS -> ITRS matrix for one instant.
///
/// Arguments
/// ---------
/// * `ts`: time scales of the instant (TT drives Q, UT1 drives R).
/// * `xp`, `yp`: polar motion in radians, zero when IERS data is absent.
pub fn gcrs_to_itrs_matrix(ts: &TimeScales, xp: Radian, yp: Radian) -> Mat3 {
    let q = celestial_matrix(ts.jd_tt);
    let r = earth_rotation_matrix(ts.jd_ut1);
    let w = polar_motion_matrix(xp, yp);
    w * r * q
}

/// Transform a GCRS vector into the Earth-fixed ITRS frame.
pub fn gcrs_to_itrs(v: &Vec3, ts: &TimeScales, xp: Radian, yp: Radian) -> Vec3 {
    gcrs_to_itrs_matrix(ts, xp, yp) * v
}

/// Transform an ITRS vector back to the GCRS: `Q^T * R^T * W^T * v`.
pub fn itrs_to_gcrs(v: &Vec3, ts: &TimeScales, xp: Radian, yp: Radian) -> Vec3 {
    let q = celestial_matrix(ts.jd_tt);
    let r = earth_rotation_matrix(ts.jd_ut1);
    let w = polar_motion_matrix(xp, yp);
    q.transpose() * (r.transpose() * (w.transpose() * v))
}

#[cfg(test)]
mod frames_test {
    use super::*;
    use crate::time_scales::{LeapSecondTable, TimeOverrides, TimeScales};
    use chrono::{TimeZone, Utc};

    fn sample_ts() -> TimeScales {
        TimeScales::compute(
            Utc.with_ymd_and_hms(2025, 3, 29, 18, 0, 0).unwrap(),
            &TimeOverrides::default(),
            &LeapSecondTable::builtin(),
        )
    }

    #[test]
    fn test_round_trip_micrometre() {
        let ts = sample_ts();
        // A Moon-distance vector: round trip must come back to < 1e-6 km.
        let v = Vec3::new(250_000.0, -220_000.0, 120_000.0);
        let back = itrs_to_gcrs(&gcrs_to_itrs(&v, &ts, 0.0, 0.0), &ts, 0.0, 0.0);
        assert!((back - v).norm() < 1e-6, "round trip error {}", (back - v).norm());
    }

    #[test]
    fn test_norm_preserved() {
        let ts = sample_ts();
        let v = Vec3::new(384_400.0, 1.0, -2.0);
        let rotated = gcrs_to_itrs(&v, &ts, 0.0, 0.0);
        assert!((rotated.norm() - v.norm()).abs() < 1e-6);
    }

    #[test]
    fn test_matrix_is_orthonormal() {
        let ts = sample_ts();
        let m = gcrs_to_itrs_matrix(&ts, 0.0, 0.0);
        let prod = m * m.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rotation_mostly_about_pole() {
        // The z component barely changes under the full transformation:
        // the CIP stays within arcseconds of the GCRS pole.
        let ts = sample_ts();
        let v = Vec3::new(0.0, 0.0, 1.0);
        let rotated = gcrs_to_itrs(&v, &ts, 0.0, 0.0);
        assert!((rotated.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_polar_motion_changes_result_slightly() {
        let ts = sample_ts();
        let v = Vec3::new(6378.0, 0.0, 0.0);
        let without = gcrs_to_itrs(&v, &ts, 0.0, 0.0);
        let xp = 0.2 * crate::constants::RADSEC;
        let with = gcrs_to_itrs(&v, &ts, xp, 0.0);
        let delta = (with - without).norm();
        // 0.2" on an Earth-radius vector is about 6 m.
        assert!(delta > 1e-4 && delta < 1e-1, "delta = {delta} km");
    }
}
