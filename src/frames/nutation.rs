//! IAU 2000B nutation: the 77-term luni-solar series.
//!
//! The truncated 2000B model keeps the 77 largest luni-solar terms of IAU
//! 2000A and drops the planetary series, which holds it within about one
//! milliarcsecond of the full model over 1995-2050. The coefficient table
//! is a fixed contract (IERS Conventions 2010, Table 5.3b / SOFA
//! `iauNut00b`); the unit tests pin the series output at reference epochs.

use crate::constants::{Radian, DPI, RADSEC};

/// Arcsecond polynomials of the five Delaunay fundamental arguments
/// (IERS Conventions 2010, Table 5.2e), reduced modulo 2 pi.
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TDB since J2000.0.
///
/// Return
/// ------
/// * `[l, l', F, D, Omega]` in radians:
///   mean anomaly of the Moon, mean anomaly of the Sun, mean argument of
///   latitude of the Moon, mean elongation of the Moon from the Sun, and
///   mean longitude of the Moon's ascending node.
pub fn fundamental_arguments(t: f64) -> [Radian; 5] {
    let l = (485868.249036
        + t * (1717915923.2178 + t * (31.8792 + t * (0.051635 + t * (-0.00024470)))))
        * RADSEC
        % DPI;
    let lp = (1287104.79305
        + t * (129596581.0481 + t * (-0.5532 + t * (0.000136 + t * (-0.00001149)))))
        * RADSEC
        % DPI;
    let f = (335779.526232
        + t * (1739527262.8478 + t * (-12.7512 + t * (-0.001037 + t * 0.00000417))))
        * RADSEC
        % DPI;
    let d = (1072260.70369
        + t * (1602961601.2090 + t * (-6.3706 + t * (0.006593 + t * (-0.00003169)))))
        * RADSEC
        % DPI;
    let om = (450160.398036
        + t * (-6962890.5431 + t * (7.4722 + t * (0.007702 + t * (-0.00005939)))))
        * RADSEC
        % DPI;
    [l, lp, f, d, om]
}

/// The 77 luni-solar terms.
///
/// Each row: `[nl, nl', nF, nD, nOm, ps, pst, pc, ec, ect, es]` where the
/// first five entries multiply the fundamental arguments and the six
/// amplitudes are in units of 0.1 microarcsecond:
///
/// ```text
/// dpsi += (ps + pst*T)*sin(arg) + pc*cos(arg)
/// deps += (ec + ect*T)*cos(arg) + es*sin(arg)
/// ```
#[rustfmt::skip]
static LUNISOLAR_TERMS: [(i8, i8, i8, i8, i8, f64, f64, f64, f64, f64, f64); 77] = [
    //  l   l'  F   D   Om          ps       pst       pc          ec      ect      es
    ( 0,  0,  0,  0,  1, -172064161.0, -174666.0,  33386.0,  92052331.0,  9086.0,  15377.0),
    ( 0,  0,  2, -2,  2,  -13170906.0,   -1675.0, -13696.0,   5730336.0, -3015.0,  -4587.0),
    ( 0,  0,  2,  0,  2,   -2276413.0,    -234.0,   2796.0,    978459.0,  -485.0,   1374.0),
    ( 0,  0,  0,  0,  2,    2074554.0,     207.0,   -698.0,   -897492.0,   470.0,   -291.0),
    ( 0,  1,  0,  0,  0,    1475877.0,   -3633.0,  11817.0,     73871.0,  -184.0,  -1924.0),
    ( 0,  1,  2, -2,  2,    -516821.0,    1226.0,   -524.0,    224386.0,  -677.0,   -174.0),
    ( 1,  0,  0,  0,  0,     711159.0,      73.0,   -872.0,     -6750.0,     0.0,    358.0),
    ( 0,  0,  2,  0,  1,    -387298.0,    -367.0,    380.0,    200728.0,    18.0,    318.0),
    ( 1,  0,  2,  0,  2,    -301461.0,     -36.0,    816.0,    129025.0,   -63.0,    367.0),
    ( 0, -1,  2, -2,  2,     215829.0,    -494.0,    111.0,    -95929.0,   299.0,    132.0),
    ( 0,  0,  2, -2,  1,     128227.0,     137.0,    181.0,    -68982.0,    -9.0,     39.0),
    (-1,  0,  2,  0,  2,     123457.0,      11.0,     19.0,    -53311.0,    32.0,     -4.0),
    (-1,  0,  0,  2,  0,     156994.0,      10.0,   -168.0,     -1235.0,     0.0,     82.0),
    ( 1,  0,  0,  0,  1,      63110.0,      63.0,     27.0,    -33228.0,     0.0,     -9.0),
    (-1,  0,  0,  0,  1,     -57976.0,     -63.0,   -189.0,     31429.0,     0.0,    -75.0),
    (-1,  0,  2,  2,  2,     -59641.0,     -11.0,    149.0,     25543.0,   -11.0,     66.0),
    ( 1,  0,  2,  0,  1,     -51613.0,     -42.0,    129.0,     26366.0,     0.0,     78.0),
    (-2,  0,  2,  0,  1,      45893.0,      50.0,     31.0,    -24236.0,   -10.0,     20.0),
    ( 0,  0,  0,  2,  0,      63384.0,      11.0,   -150.0,     -1220.0,     0.0,     29.0),
    ( 0,  0,  2,  2,  2,     -38571.0,      -1.0,    158.0,     16452.0,   -11.0,     68.0),
    ( 0, -2,  2, -2,  2,      32481.0,       0.0,      0.0,    -13870.0,     0.0,      0.0),
    (-2,  0,  0,  2,  0,     -47722.0,       0.0,    -18.0,       477.0,     0.0,    -25.0),
    ( 2,  0,  2,  0,  2,     -31046.0,      -1.0,    131.0,     13238.0,   -11.0,     59.0),
    ( 1,  0,  2, -2,  2,      28593.0,       0.0,     -1.0,    -12338.0,    10.0,     -3.0),
    (-1,  0,  2,  0,  1,      20441.0,      21.0,     10.0,    -10758.0,     0.0,     -3.0),
    ( 2,  0,  0,  0,  0,      29243.0,       0.0,    -74.0,      -609.0,     0.0,     13.0),
    ( 0,  0,  2,  0,  0,      25887.0,       0.0,    -66.0,      -550.0,     0.0,     11.0),
    ( 0,  1,  0,  0,  1,     -14053.0,     -25.0,     79.0,      8551.0,    -2.0,    -45.0),
    (-1,  0,  0,  2,  1,      15164.0,      10.0,     11.0,     -8001.0,     0.0,     -1.0),
    ( 0,  2,  2, -2,  2,     -15794.0,      72.0,    -16.0,      6850.0,   -42.0,     -5.0),
    ( 0,  0, -2,  2,  0,      21783.0,       0.0,     13.0,      -167.0,     0.0,     13.0),
    ( 1,  0,  0, -2,  1,     -12873.0,     -10.0,    -37.0,      6953.0,     0.0,    -14.0),
    ( 0, -1,  0,  0,  1,     -12654.0,      11.0,     63.0,      6415.0,     0.0,     26.0),
    (-1,  0,  2,  2,  1,     -10204.0,       0.0,     25.0,      5222.0,     0.0,     15.0),
    ( 0,  2,  0,  0,  0,      16707.0,     -85.0,    -10.0,       168.0,    -1.0,     10.0),
    ( 1,  0,  2,  2,  2,      -7691.0,       0.0,     44.0,      3268.0,     0.0,     19.0),
    (-2,  0,  2,  0,  0,     -11024.0,       0.0,    -14.0,       104.0,     0.0,      2.0),
    ( 0,  1,  2,  0,  2,       7566.0,     -21.0,    -11.0,     -3250.0,     0.0,     -5.0),
    ( 0,  0,  2,  2,  1,      -6637.0,     -11.0,     25.0,      3353.0,     0.0,     14.0),
    ( 0, -1,  2,  0,  2,      -7141.0,      21.0,      8.0,      3070.0,     0.0,      4.0),
    ( 0,  0,  0,  2,  1,      -6302.0,     -11.0,      2.0,      3272.0,     0.0,      4.0),
    ( 1,  0,  2, -2,  1,       5800.0,      10.0,      2.0,     -3045.0,     0.0,     -1.0),
    ( 2,  0,  2, -2,  2,       6443.0,       0.0,     -7.0,     -2768.0,     0.0,     -4.0),
    (-2,  0,  0,  2,  1,      -5774.0,     -11.0,    -15.0,      3041.0,     0.0,     -5.0),
    ( 2,  0,  2,  0,  1,      -5350.0,       0.0,     21.0,      2695.0,     0.0,     12.0),
    ( 0, -1,  2, -2,  1,      -4752.0,     -11.0,     -3.0,      2719.0,     0.0,     -3.0),
    ( 0,  0,  0, -2,  1,      -4940.0,     -11.0,    -21.0,      2720.0,     0.0,     -9.0),
    (-1, -1,  0,  2,  0,       7350.0,       0.0,     -8.0,       -51.0,     0.0,      4.0),
    ( 2,  0,  0, -2,  1,      -4803.0,       0.0,      0.0,      2556.0,     0.0,      0.0),
    ( 1,  0,  0,  2,  0,      -7677.0,       0.0,      0.0,       462.0,     0.0,      0.0),
    ( 0,  1,  2, -2,  1,       5417.0,       0.0,      0.0,     -2520.0,     0.0,      0.0),
    ( 1, -1,  0,  0,  0,       6624.0,       0.0,      0.0,      -468.0,     0.0,      0.0),
    (-2,  0,  2,  0,  2,      -5433.0,       0.0,      0.0,      2334.0,     0.0,      0.0),
    ( 3,  0,  2,  0,  2,      -4632.0,       0.0,      0.0,      1991.0,     0.0,      0.0),
    ( 0, -1,  0,  2,  0,       6106.0,       0.0,      0.0,      -167.0,     0.0,      0.0),
    ( 1, -1,  2,  0,  2,      -3593.0,       0.0,      0.0,      1556.0,     0.0,      0.0),
    ( 0,  0,  0,  1,  0,      -4766.0,       0.0,      0.0,       270.0,     0.0,      0.0),
    (-1, -1,  2,  2,  2,      -4095.0,       0.0,      0.0,      1793.0,     0.0,      0.0),
    (-1,  0,  2,  0,  0,       4229.0,       0.0,      0.0,      -101.0,     0.0,      0.0),
    ( 0, -1,  2,  2,  2,      -3372.0,       0.0,      0.0,      1487.0,     0.0,      0.0),
    ( 2,  0,  0,  0,  1,      -3353.0,       0.0,      0.0,      1758.0,     0.0,      0.0),
    ( 1,  0,  2,  0,  0,      -3523.0,       0.0,      0.0,       246.0,     0.0,      0.0),
    ( 1,  1,  0,  0,  0,      -3613.0,       0.0,      0.0,       329.0,     0.0,      0.0),
    (-1,  0,  2, -2,  1,       3522.0,       0.0,      0.0,     -1830.0,     0.0,      0.0),
    ( 2,  0,  0,  0, -1,       3312.0,       0.0,      0.0,     -1730.0,     0.0,      0.0),
    ( 0,  0, -2,  2,  1,      -3142.0,       0.0,      0.0,      1704.0,     0.0,      0.0),
    ( 0,  1,  0,  0, -1,      -2927.0,       0.0,      0.0,      1564.0,     0.0,      0.0),
    ( 0,  1,  2,  0,  1,      -2887.0,       0.0,      0.0,      1401.0,     0.0,      0.0),
    ( 0, -1,  2,  0,  1,       2451.0,       0.0,      0.0,     -1200.0,     0.0,      0.0),
    ( 2,  0, -2,  0,  0,      -2790.0,       0.0,      0.0,       410.0,     0.0,      0.0),
    (-1,  0,  0,  2, -1,       2145.0,       0.0,      0.0,     -1154.0,     0.0,      0.0),
    ( 0,  0,  2, -2,  0,       2816.0,       0.0,      0.0,       286.0,     0.0,      0.0),
    ( 0,  1,  0, -2,  0,       2700.0,       0.0,      0.0,      -258.0,     0.0,      0.0),
    ( 1,  0,  0, -1,  0,      -2330.0,       0.0,      0.0,       -37.0,     0.0,      0.0),
    ( 0,  0,  0,  0,  2,       2283.0,       0.0,      0.0,     -1039.0,     0.0,      0.0),
    ( 1,  0, -2,  0,  0,      -2321.0,       0.0,      0.0,       284.0,     0.0,      0.0),
    (-1,  0,  0,  1,  1,      -2049.0,       0.0,      0.0,      1112.0,     0.0,      0.0),
];

/// IAU 2000B nutation in longitude and obliquity.
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TDB since J2000.0.
///
/// Return
/// ------
/// * `(delta_psi, delta_eps)` in radians.
pub fn nutation_iau2000b(t: f64) -> (Radian, Radian) {
    let [l, lp, f, d, om] = fundamental_arguments(t);

    let mut dpsi = 0.0;
    let mut deps = 0.0;

    for &(nl, nlp, nf, nd, nom, ps, pst, pc, ec, ect, es) in &LUNISOLAR_TERMS {
        let arg = nl as f64 * l + nlp as f64 * lp + nf as f64 * f + nd as f64 * d + nom as f64 * om;
        let (sin_arg, cos_arg) = arg.sin_cos();

        dpsi += (ps + pst * t) * sin_arg + pc * cos_arg;
        deps += (ec + ect * t) * cos_arg + es * sin_arg;
    }

    // 0.1 microarcsecond -> arcsecond -> radian
    (dpsi * 1e-7 * RADSEC, deps * 1e-7 * RADSEC)
}

#[cfg(test)]
mod nutation_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_series_at_j2000() {
        // Reference sum of the table at T = 0, in arcseconds.
        let (dpsi, deps) = nutation_iau2000b(0.0);
        assert_relative_eq!(dpsi / RADSEC, -13.931521486597106, epsilon = 1e-6);
        assert_relative_eq!(deps / RADSEC, -5.770425743349729, epsilon = 1e-6);
    }

    #[test]
    fn test_series_quarter_century() {
        let (dpsi, deps) = nutation_iau2000b(0.25);
        assert_relative_eq!(dpsi / RADSEC, 0.15750550860427018, epsilon = 1e-6);
        assert_relative_eq!(deps / RADSEC, 8.491607658969512, epsilon = 1e-6);
    }

    #[test]
    fn test_series_1900() {
        let (dpsi, deps) = nutation_iau2000b(-1.0);
        assert_relative_eq!(dpsi / RADSEC, 17.348422977536213, epsilon = 1e-6);
        assert_relative_eq!(deps / RADSEC, -2.294082509393866, epsilon = 1e-6);
    }

    #[test]
    fn test_agrees_with_iau1980_to_centi_arcsecond() {
        // The 1980 (Wahr) series evaluated at J2000 gives
        // (-13.923385, -5.773808) arcsec; the 2000B model must land within
        // a few tens of milliarcseconds of it.
        let (dpsi, deps) = nutation_iau2000b(0.0);
        assert!((dpsi / RADSEC - (-13.923385)).abs() < 0.02);
        assert!((deps / RADSEC - (-5.773808)).abs() < 0.02);
    }

    #[test]
    fn test_amplitude_bounds() {
        // Nutation in longitude stays within +/-20", obliquity within +/-10".
        for i in 0..100 {
            let t = -1.0 + 0.02 * i as f64;
            let (dpsi, deps) = nutation_iau2000b(t);
            assert!(dpsi.abs() / RADSEC < 20.0);
            assert!(deps.abs() / RADSEC < 10.0);
        }
    }

    #[test]
    fn test_fundamental_arguments_at_j2000() {
        let [l, lp, f, d, om] = fundamental_arguments(0.0);
        // Mean anomaly of the Moon at J2000: 134.963...deg
        assert_relative_eq!(l.to_degrees(), 485868.249036 / 3600.0, epsilon = 1e-9);
        // Node: 125.044...deg
        assert_relative_eq!(om.to_degrees(), 450160.398036 / 3600.0, epsilon = 1e-9);
        assert!(lp > 0.0 && f > 0.0 && d > 0.0);
    }
}
