//! CIP coordinates, the CIO locator, the Earth Rotation Angle and polar
//! motion: the three factors of the celestial-to-terrestrial chain.

use crate::constants::{JulianDate, Mat3, Radian, DAYS_PER_CENTURY, DPI, J2000, RADSEC};
use crate::frames::nutation::nutation_iau2000b;
use crate::math::rotmt;

/// Mean obliquity of the ecliptic, IAU 2006 polynomial.
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TT since J2000.0.
///
/// Return
/// ------
/// * Mean obliquity in radians.
pub fn mean_obliquity(t: f64) -> Radian {
    (84381.406
        + t * (-46.836769
            + t * (-0.0001831 + t * (0.00200340 + t * (-0.000000576 + t * (-0.0000000434))))))
        * RADSEC
}

/// Coordinates of the Celestial Intermediate Pole in the GCRS.
///
/// The IAU 2006 precession polynomials give the secular part; the IAU
/// 2000B nutation folds in as `X += dpsi*sin(eps0)`, `Y -= deps`.
///
/// Arguments
/// ---------
/// * `jd_tt`: TT Julian Date.
///
/// Return
/// ------
/// * `(x, y)` in radians.
pub fn cip_xy(jd_tt: JulianDate) -> (Radian, Radian) {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;

    // Polynomial parts of the IAU 2006/2000A X, Y series (arcseconds).
    let x_prec = -0.016617
        + t * (2004.191898
            + t * (-0.4297829 + t * (-0.19861834 + t * (0.000007578 + t * 0.0000059285))));
    let y_prec = -0.006951
        + t * (-0.025896
            + t * (-22.4072747 + t * (0.00190059 + t * (0.001112526 + t * 0.0000001358))));

    let (dpsi, deps) = nutation_iau2000b(t);
    let eps0 = mean_obliquity(t);

    let x = x_prec * RADSEC + dpsi * eps0.sin();
    let y = y_prec * RADSEC - deps;
    (x, y)
}

/// The CIO locator s.
///
/// The dominant term is `-X*Y/2`; the remaining polynomial is truncated to
/// its linear part, which keeps s within a few microarcseconds over the
/// kernel's 1849-2150 span.
pub fn cio_locator_s(x: Radian, y: Radian, t: f64) -> Radian {
    -x * y / 2.0 + (-0.041775 * t) * RADSEC
}

/// Celestial motion matrix Q: GCRS -> CIRS (the CIP/CIO frame).
///
/// With `e = atan2(Y, X)` and `d = asin(sqrt(X^2 + Y^2))`:
///
/// ```text
/// Q = Rz(-(e+s)) * Ry(d) * Rz(e)
/// ```
pub fn celestial_matrix(jd_tt: JulianDate) -> Mat3 {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    let (x, y) = cip_xy(jd_tt);
    let s = cio_locator_s(x, y, t);

    let r2 = x * x + y * y;
    let e = if r2 > 0.0 { y.atan2(x) } else { 0.0 };
    let d = r2.sqrt().min(1.0).asin();

    rotmt(-(e + s), 2) * rotmt(d, 1) * rotmt(e, 2)
}

/// Earth Rotation Angle for a UT1 Julian Date, in radians in `[0, 2 pi)`.
///
/// ```text
/// ERA = 2 pi * frac(0.7790572732640 + 1.00273781191135448 * (jd_ut1 - J2000))
/// ```
pub fn earth_rotation_angle(jd_ut1: JulianDate) -> Radian {
    let du = jd_ut1 - J2000;
    let frac = (0.7790572732640 + 1.00273781191135448 * du).rem_euclid(1.0);
    DPI * frac
}

/// Earth rotation matrix R: CIRS -> TIRS.
pub fn earth_rotation_matrix(jd_ut1: JulianDate) -> Mat3 {
    rotmt(earth_rotation_angle(jd_ut1), 2)
}

/// Polar motion matrix W: TIRS -> ITRS, `W = Ry(xp) * Rx(-yp)`.
///
/// `xp`, `yp` are the pole coordinates in radians (IERS Bulletin A); both
/// default to zero in the pipeline, which keeps the pole within 0.3
/// arcseconds of truth.
pub fn polar_motion_matrix(xp: Radian, yp: Radian) -> Mat3 {
    if xp == 0.0 && yp == 0.0 {
        return Mat3::identity();
    }
    rotmt(xp, 1) * rotmt(-yp, 0)
}

#[cfg(test)]
mod cio_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_era_at_j2000() {
        // frac(0.7790572732640) * 2 pi
        let expected = DPI * 0.7790572732640;
        assert_relative_eq!(earth_rotation_angle(2_451_545.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_era_range() {
        for i in 0..1000 {
            let era = earth_rotation_angle(J2000 + i as f64 * 0.37);
            assert!((0.0..DPI).contains(&era));
        }
    }

    #[test]
    fn test_era_advances_just_over_a_turn_per_day() {
        let era0 = earth_rotation_angle(J2000);
        let era1 = earth_rotation_angle(J2000 + 1.0);
        let advance = (era1 - era0).rem_euclid(DPI);
        // 0.00273781... of a turn past a full revolution
        assert_relative_eq!(advance, DPI * 0.00273781191135448, epsilon = 1e-10);
    }

    #[test]
    fn test_mean_obliquity_j2000() {
        assert_relative_eq!(mean_obliquity(0.0) / RADSEC, 84381.406, epsilon = 1e-9);
    }

    #[test]
    fn test_cip_near_j2000() {
        let (x, y) = cip_xy(J2000);
        // At J2000 the CIP sits within a second of arc of the GCRS pole;
        // X is dominated by dpsi*sin(eps) (about -5.5"), Y by -deps (+5.8").
        assert!(x.abs() / RADSEC < 10.0, "X = {}\"", x / RADSEC);
        assert!(y.abs() / RADSEC < 10.0, "Y = {}\"", y / RADSEC);
    }

    #[test]
    fn test_cip_precession_drift() {
        // Over a quarter century X grows by roughly 500".
        let (x, _) = cip_xy(J2000 + 25.0 * 365.25);
        assert!(x / RADSEC > 400.0 && x / RADSEC < 600.0, "X = {}\"", x / RADSEC);
    }

    #[test]
    fn test_celestial_matrix_orthonormal() {
        let q = celestial_matrix(2_460_000.5);
        let prod = q * q.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_polar_motion_default_identity() {
        assert_eq!(polar_motion_matrix(0.0, 0.0), Mat3::identity());
    }

    #[test]
    fn test_polar_motion_small_angle() {
        let xp = 0.2 * RADSEC;
        let yp = 0.3 * RADSEC;
        let w = polar_motion_matrix(xp, yp);
        // Exact elements of Ry(xp) * Rx(-yp).
        assert_relative_eq!(w[(0, 2)], -xp.sin() * yp.cos(), epsilon = 1e-15);
        assert_relative_eq!(w[(1, 2)], -yp.sin(), epsilon = 1e-15);
        // Orthonormal as well.
        let prod = w * w.transpose();
        assert_relative_eq!(prod[(0, 0)], 1.0, epsilon = 1e-14);
        assert_relative_eq!(prod[(0, 1)], 0.0, epsilon = 1e-14);
    }
}
