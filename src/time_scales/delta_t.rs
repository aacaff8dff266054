//! Espenak-Meeus polynomial expressions for Delta T = TT - UT1.
//!
//! Piecewise fits published with the NASA Five Millennium Canon of Solar
//! Eclipses, covering -1999 to +3000. Used whenever the caller provides
//! neither a Delta T nor a UT1-UTC override.

use crate::constants::{JulianDate, J2000};
use crate::time_scales::jd_to_date;
use chrono::Datelike;

/// Delta T in seconds for a TT Julian Date.
///
/// The decimal year is formed as `year + (month - 0.5) / 12`, the
/// convention the published fits were made in.
pub fn delta_t_for_jd(jd_tt: JulianDate) -> f64 {
    let date = jd_to_date(jd_tt);
    let year = date.year() as f64 + (date.month() as f64 - 0.5) / 12.0;
    espenak_meeus_delta_t(year)
}

/// Delta T in seconds for a decimal year.
///
/// The coefficients are the published ones; each branch is a polynomial in
/// a shifted year variable evaluated by Horner's scheme.
pub fn espenak_meeus_delta_t(year: f64) -> f64 {
    if year < -500.0 {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    } else if year < 500.0 {
        let u = year / 100.0;
        10583.6
            + u * (-1014.41
                + u * (33.78311
                    + u * (-5.952053
                        + u * (-0.1798452 + u * (0.022174192 + u * 0.0090316521)))))
    } else if year < 1600.0 {
        let u = (year - 1000.0) / 100.0;
        1574.2
            + u * (-556.01
                + u * (71.23472
                    + u * (0.319781
                        + u * (-0.8503463 + u * (-0.005050998 + u * 0.0083572073)))))
    } else if year < 1700.0 {
        let t = year - 1600.0;
        120.0 + t * (-0.9808 + t * (-0.01532 + t / 7129.0))
    } else if year < 1800.0 {
        let t = year - 1700.0;
        8.83 + t * (0.1603 + t * (-0.0059285 + t * (0.00013336 - t / 1_174_000.0)))
    } else if year < 1860.0 {
        let t = year - 1800.0;
        13.72
            + t * (-0.332447
                + t * (0.0068612
                    + t * (0.0041116
                        + t * (-0.00037436
                            + t * (0.0000121272
                                + t * (-0.0000001699 + t * 0.000000000875))))))
    } else if year < 1900.0 {
        let t = year - 1860.0;
        7.62 + t * (0.5737
            + t * (-0.251754 + t * (0.01680668 + t * (-0.0004473624 + t / 233_174.0))))
    } else if year < 1920.0 {
        let t = year - 1900.0;
        -2.79 + t * (1.494119 + t * (-0.0598939 + t * (0.0061966 - t * 0.000197)))
    } else if year < 1941.0 {
        let t = year - 1920.0;
        21.20 + t * (0.84493 + t * (-0.076100 + t * 0.0020936))
    } else if year < 1961.0 {
        let t = year - 1950.0;
        29.07 + t * (0.407 + t * (-1.0 / 233.0 + t / 2547.0))
    } else if year < 1986.0 {
        let t = year - 1975.0;
        45.45 + t * (1.067 + t * (-1.0 / 260.0 - t / 718.0))
    } else if year < 2005.0 {
        let t = year - 2000.0;
        63.86
            + t * (0.3345
                + t * (-0.060374
                    + t * (0.0017275 + t * (0.000651814 + t * 0.00002373599))))
    } else if year < 2050.0 {
        let t = year - 2000.0;
        62.92 + t * (0.32217 + t * 0.005589)
    } else if year < 2150.0 {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - year)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    }
}

/// Convenience: Delta T at J2000.0 (close to 63.8 s).
pub fn delta_t_j2000() -> f64 {
    delta_t_for_jd(J2000)
}
