//! Kernel-free Sun and Moon positions from the truncated Meeus series.
//!
//! Sun: chapter 25 (equation of center, apparent longitude). Moon: chapter
//! 47 with the 30 leading longitude/distance terms and 20 latitude terms.
//! Accuracy is about 0.01 degrees for the Sun and a few hundredths of a
//! degree for the Moon, enough for phase, illumination and a rough
//! visibility estimate when no SPK kernel is available.

use crate::constants::{Degree, JulianDate, Kilometer, Vec3, AU, DAYS_PER_CENTURY, J2000};
use crate::frames::mean_obliquity;

/// Geocentric ecliptic position: longitude/latitude in degrees, distance
/// in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    pub longitude: Degree,
    pub latitude: Degree,
    pub distance_km: Kilometer,
}

/// Chapter 47, table 47.A: arguments (D, M, M', F) and the sine/cosine
/// amplitudes for longitude (1e-6 degree) and distance (1e-3 km).
#[rustfmt::skip]
static MOON_LONGITUDE_DISTANCE: [(i8, i8, i8, i8, f64, f64); 30] = [
    (0, 0, 1, 0,   6288774.0, -20905355.0),
    (2, 0, -1, 0,  1274027.0,  -3699111.0),
    (2, 0, 0, 0,    658314.0,  -2955968.0),
    (0, 0, 2, 0,    213618.0,   -569925.0),
    (0, 1, 0, 0,   -185116.0,     48888.0),
    (0, 0, 0, 2,   -114332.0,     -3149.0),
    (2, 0, -2, 0,    58793.0,    246158.0),
    (2, -1, -1, 0,   57066.0,   -152138.0),
    (2, 0, 1, 0,     53322.0,   -170733.0),
    (2, -1, 0, 0,    45758.0,   -204586.0),
    (0, 1, -1, 0,   -40923.0,   -129620.0),
    (1, 0, 0, 0,    -34720.0,    108743.0),
    (0, 1, 1, 0,    -30383.0,    104755.0),
    (2, 0, 0, -2,    15327.0,     10321.0),
    (0, 0, 1, 2,    -12528.0,         0.0),
    (0, 0, 1, -2,    10980.0,     79661.0),
    (4, 0, -1, 0,    10675.0,    -34782.0),
    (0, 0, 3, 0,     10034.0,    -23210.0),
    (4, 0, -2, 0,     8548.0,    -21636.0),
    (2, 1, -1, 0,    -7888.0,     24208.0),
    (2, 1, 0, 0,     -6766.0,     30824.0),
    (1, 0, -1, 0,    -5163.0,     -8379.0),
    (1, 1, 0, 0,      4987.0,    -16675.0),
    (2, -1, 1, 0,     4036.0,    -12831.0),
    (2, 0, 2, 0,      3994.0,    -10445.0),
    (4, 0, 0, 0,      3861.0,    -11650.0),
    (2, 0, -3, 0,     3665.0,     14403.0),
    (0, 1, -2, 0,    -2689.0,     -7003.0),
    (2, 0, -1, 2,    -2602.0,         0.0),
    (2, -1, -2, 0,    2390.0,     10056.0),
];

/// Chapter 47, table 47.B: latitude terms (1e-6 degree).
#[rustfmt::skip]
static MOON_LATITUDE: [(i8, i8, i8, i8, f64); 20] = [
    (0, 0, 0, 1,   5128122.0),
    (0, 0, 1, 1,    280602.0),
    (0, 0, 1, -1,   277693.0),
    (2, 0, 0, -1,   173237.0),
    (2, 0, -1, 1,    55413.0),
    (2, 0, -1, -1,   46271.0),
    (2, 0, 0, 1,     32573.0),
    (0, 0, 2, 1,     17198.0),
    (2, 0, 1, -1,     9266.0),
    (0, 0, 2, -1,     8822.0),
    (2, -1, 0, -1,    8216.0),
    (2, 0, -2, -1,    4324.0),
    (2, 0, 1, 1,      4200.0),
    (2, 1, 0, -1,    -3359.0),
    (2, -1, -1, 1,    2463.0),
    (2, -1, 0, 1,     2211.0),
    (2, -1, -1, -1,   2065.0),
    (0, 1, -1, -1,   -1870.0),
    (4, 0, -1, -1,    1828.0),
    (0, 1, 0, 1,     -1794.0),
];

/// Moon geocentric ecliptic position (chapter 47).
pub fn moon_ecliptic(jd_tt: JulianDate) -> EclipticPosition {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    // Mean longitude, elongation, anomalies and argument of latitude.
    let lp = 218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538841.0
        - t4 / 65194000.0;
    let d = 297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545868.0
        - t4 / 113065000.0;
    let m = 357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24490000.0;
    let mp = 134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69699.0
        - t4 / 14712000.0;
    let f = 93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3526000.0
        + t4 / 863310000.0;

    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479264.290 * t;
    let a3 = 313.45 + 481266.484 * t;

    // Damping of terms in the solar anomaly by the shrinking eccentricity
    // of the Earth's orbit, applied as E^|m|.
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(cd, cm, cmp, cf, sl, sr) in &MOON_LONGITUDE_DISTANCE {
        let arg = (cd as f64 * d + cm as f64 * m + cmp as f64 * mp + cf as f64 * f).to_radians();
        let damping = e.powi(cm.unsigned_abs() as i32);
        sum_l += sl * damping * arg.sin();
        sum_r += sr * damping * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, sb) in &MOON_LATITUDE {
        let arg = (cd as f64 * d + cm as f64 * m + cmp as f64 * mp + cf as f64 * f).to_radians();
        sum_b += sb * e.powi(cm.unsigned_abs() as i32) * arg.sin();
    }

    // Venus, Jupiter and flattening additives (chapter 47).
    sum_l += 3958.0 * a1.to_radians().sin()
        + 1962.0 * (lp - f).to_radians().sin()
        + 318.0 * a2.to_radians().sin();
    sum_b += -2235.0 * lp.to_radians().sin()
        + 382.0 * a3.to_radians().sin()
        + 175.0 * (a1 - f).to_radians().sin()
        + 175.0 * (a1 + f).to_radians().sin()
        + 127.0 * (lp - mp).to_radians().sin()
        - 115.0 * (lp + mp).to_radians().sin();

    EclipticPosition {
        longitude: (lp + sum_l / 1e6).rem_euclid(360.0),
        latitude: sum_b / 1e6,
        distance_km: 385000.56 + sum_r / 1000.0,
    }
}

/// Sun geocentric ecliptic position (chapter 25), apparent longitude.
pub fn sun_ecliptic(jd_tt: JulianDate) -> EclipticPosition {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;

    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = 357.52911 + 35999.05029 * t - 0.0001537 * t * t;
    let ecc = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;

    let m_rad = m.to_radians();
    let center = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m_rad.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m_rad).sin()
        + 0.000289 * (3.0 * m_rad).sin();

    let true_longitude = l0 + center;
    let true_anomaly = m + center;
    let radius_au =
        1.000001018 * (1.0 - ecc * ecc) / (1.0 + ecc * true_anomaly.to_radians().cos());

    // Aberration and nutation in longitude fold into the apparent value.
    let omega = 125.04 - 1934.136 * t;
    let apparent = true_longitude - 0.00569 - 0.00478 * omega.to_radians().sin();

    EclipticPosition {
        longitude: apparent.rem_euclid(360.0),
        latitude: 0.0,
        distance_km: radius_au * AU,
    }
}

/// Rotate an ecliptic-of-date position into the equatorial frame by the
/// mean obliquity, producing a Cartesian vector in kilometers.
///
/// The frame is treated as GCRS; the equinox-of-date versus GCRS
/// difference is far below the accuracy of the truncated series.
pub fn ecliptic_to_equatorial_km(position: &EclipticPosition, jd_tt: JulianDate) -> Vec3 {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    let eps = mean_obliquity(t);
    let (sin_eps, cos_eps) = eps.sin_cos();

    let lambda = position.longitude.to_radians();
    let beta = position.latitude.to_radians();
    let (sin_lambda, cos_lambda) = lambda.sin_cos();
    let (sin_beta, cos_beta) = beta.sin_cos();
    let r = position.distance_km;

    Vec3::new(
        r * cos_beta * cos_lambda,
        r * (cos_beta * sin_lambda * cos_eps - sin_beta * sin_eps),
        r * (cos_beta * sin_lambda * sin_eps + sin_beta * cos_eps),
    )
}

/// Moon geocentric position in km, equatorial (GCRS-like).
pub fn moon_gcrs_km(jd_tt: JulianDate) -> Vec3 {
    ecliptic_to_equatorial_km(&moon_ecliptic(jd_tt), jd_tt)
}

/// Sun geocentric position in km, equatorial (GCRS-like).
pub fn sun_gcrs_km(jd_tt: JulianDate) -> Vec3 {
    ecliptic_to_equatorial_km(&sun_ecliptic(jd_tt), jd_tt)
}

#[cfg(test)]
mod meeus_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moon_example_47a() {
        // 1992 April 12.0 TD. Full-series reference: lambda 133.162655,
        // beta -3.229126, distance 368409.7 km; the truncated series lands
        // within a few thousandths of a degree and ~50 km.
        let p = moon_ecliptic(2_448_724.5);
        assert_relative_eq!(p.longitude, 133.162655, epsilon = 0.01);
        assert_relative_eq!(p.latitude, -3.229126, epsilon = 0.01);
        assert!((p.distance_km - 368_409.7).abs() < 60.0);
    }

    #[test]
    fn test_sun_example_25a() {
        // 1992 October 13.0 TD: apparent longitude 199.90895 (low-accuracy
        // chapter 25 value), R = 0.99766 AU.
        let p = sun_ecliptic(2_448_908.5);
        assert_relative_eq!(p.longitude, 199.90895, epsilon = 5e-4);
        assert_relative_eq!(p.distance_km / AU, 0.99766, epsilon = 1e-4);
        assert_eq!(p.latitude, 0.0);
    }

    #[test]
    fn test_moon_distance_range() {
        // Perigee/apogee bounds over a saros-length sweep.
        for i in 0..700 {
            let jd = J2000 + i as f64 * 9.7;
            let p = moon_ecliptic(jd);
            assert!(
                (354_000.0..407_000.0).contains(&p.distance_km),
                "distance {} at jd {}",
                p.distance_km,
                jd
            );
            assert!(p.latitude.abs() < 5.4);
        }
    }

    #[test]
    fn test_sun_distance_range() {
        for i in 0..366 {
            let jd = J2000 + i as f64;
            let r = sun_ecliptic(jd).distance_km / AU;
            assert!((0.982..1.018).contains(&r), "R = {r} AU");
        }
    }

    #[test]
    fn test_equatorial_vector_magnitude() {
        let jd = 2_460_700.5;
        let p = moon_ecliptic(jd);
        let v = moon_gcrs_km(jd);
        assert_relative_eq!(v.norm(), p.distance_km, epsilon = 1e-6);
    }

    #[test]
    fn test_new_moon_2025_03_29() {
        // The Moon passed the Sun's longitude near 11:00 UTC; at 18:00 TT
        // the elongation in longitude is about 4 degrees.
        let jd = 2_460_764.25;
        let moon = moon_ecliptic(jd);
        let sun = sun_ecliptic(jd);
        let elongation =
            crate::math::normalize_deg_signed(moon.longitude - sun.longitude);
        assert!(
            elongation > 2.0 && elongation < 6.0,
            "elongation {elongation}"
        );
    }
}
