//! Time scale chain: UTC → TAI → TT → TDB, and TT ↔ UT1.
//!
//! A [`TimeScales`] record carries every Julian Date the pipeline needs for
//! a single instant. The chain is exact where the definitions are exact
//! (TAI-UTC from the leap second table, TT-TAI = 32.184 s) and matches the
//! SPICE convention for the sub-millisecond TDB-TT sinusoid so that epochs
//! handed to the SPK reader line up with NAIF's.

pub mod delta_t;
pub mod leap_seconds;
pub mod lsk;

pub use leap_seconds::LeapSecondTable;

use crate::constants::{EphemerisTime, JulianDate, RADEG, SECONDS_PER_DAY, J2000, TT_MINUS_TAI};
use chrono::{DateTime, Utc};

/// Convert a civil UTC instant to a Julian Date.
///
/// `jd = unix_ms / 86_400_000 + 2_440_587.5`; exact to the millisecond the
/// instant is stored with.
pub fn date_to_jd(utc: &DateTime<Utc>) -> JulianDate {
    utc.timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5
}

/// Inverse of [`date_to_jd`], rounding to the nearest millisecond.
pub fn jd_to_date(jd: JulianDate) -> DateTime<Utc> {
    let unix_ms = ((jd - 2_440_587.5) * 86_400_000.0).round() as i64;
    DateTime::from_timestamp_millis(unix_ms)
        .expect("Julian date outside the representable civil range")
}

/// TDB-TT in seconds at a TT Julian Date.
///
/// The two-term sinusoid in the Earth's mean anomaly used by SPICE. The
/// effect never exceeds 1.7 ms; it is applied anyway so that ephemeris
/// times agree with NAIF to the microsecond.
pub fn tdb_minus_tt(jd_tt: JulianDate) -> f64 {
    let g = (357.53 + 0.985_600_3 * (jd_tt - J2000)) * RADEG;
    0.001_658 * g.sin() + 0.000_014 * (2.0 * g).sin()
}

/// Convert a TT Julian Date to ephemeris time (TDB seconds past J2000),
/// the time argument SPK Chebyshev records are indexed by.
pub fn jd_tt_to_et(jd_tt: JulianDate) -> EphemerisTime {
    (jd_tt - J2000) * SECONDS_PER_DAY + tdb_minus_tt(jd_tt)
}

/// Optional per-query overrides of the Earth rotation unknowns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeOverrides {
    /// TT - UT1 in seconds; used when `ut1_utc` is absent.
    pub delta_t: Option<f64>,
    /// UT1 - UTC in seconds (IERS Bulletin A); takes precedence.
    pub ut1_utc: Option<f64>,
}

/// Every time scale of a single instant.
///
/// Invariants (tested):
/// * `jd_tt - jd_utc = (delta_at + 32.184) / 86400`, to one f64 rounding
///   at Julian Date magnitude.
/// * `jd_tdb - jd_tt` below 2e-8 day.
/// * `jd_ut1 = jd_tt - delta_t / 86400`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScales {
    /// The civil instant this record was built from.
    pub utc: DateTime<Utc>,
    pub jd_utc: JulianDate,
    pub jd_tt: JulianDate,
    pub jd_tdb: JulianDate,
    pub jd_ut1: JulianDate,
    /// TT - UT1 in seconds.
    pub delta_t: f64,
    /// TAI - UTC in seconds.
    pub delta_at: f64,
}

impl TimeScales {
    /// Build the full chain for a UTC instant.
    ///
    /// Arguments
    /// ---------
    /// * `utc`: the civil instant.
    /// * `overrides`: optional Delta T / UT1-UTC values; without either,
    ///   UT1 comes from the Espenak-Meeus Delta T polynomial.
    /// * `table`: the leap second table for TAI-UTC.
    pub fn compute(
        utc: DateTime<Utc>,
        overrides: &TimeOverrides,
        table: &LeapSecondTable,
    ) -> TimeScales {
        let jd_utc = date_to_jd(&utc);
        let delta_at = table.delta_at(jd_utc);

        let jd_tai = jd_utc + delta_at / SECONDS_PER_DAY;
        let jd_tt = jd_tai + TT_MINUS_TAI / SECONDS_PER_DAY;
        let jd_tdb = jd_tt + tdb_minus_tt(jd_tt) / SECONDS_PER_DAY;

        let (jd_ut1, delta_t) = if let Some(ut1_utc) = overrides.ut1_utc {
            let jd_ut1 = jd_utc + ut1_utc / SECONDS_PER_DAY;
            (jd_ut1, (jd_tt - jd_ut1) * SECONDS_PER_DAY)
        } else {
            let delta_t = overrides
                .delta_t
                .unwrap_or_else(|| delta_t::delta_t_for_jd(jd_tt));
            (jd_tt - delta_t / SECONDS_PER_DAY, delta_t)
        };

        TimeScales {
            utc,
            jd_utc,
            jd_tt,
            jd_tdb,
            jd_ut1,
            delta_t,
            delta_at,
        }
    }

    /// Rebuild approximate time scales from an ephemeris time alone.
    ///
    /// Used by the event search, whose scan variable is `et`. The UTC
    /// estimate ignores the TDB-TT sinusoid and probes the leap table
    /// slightly in the past (70 s) so that an `et` falling right on a leap
    /// boundary still resolves; the result is within about a second of the
    /// exact inverse, which is far below the 600 s scan step.
    pub fn from_et(
        et: EphemerisTime,
        overrides: &TimeOverrides,
        table: &LeapSecondTable,
    ) -> TimeScales {
        let jd_tt = J2000 + et / SECONDS_PER_DAY;
        let delta_at = table.delta_at(jd_tt - 70.0 / SECONDS_PER_DAY);
        let jd_utc = jd_tt - (delta_at + TT_MINUS_TAI) / SECONDS_PER_DAY;
        TimeScales::compute(jd_to_date(jd_utc), overrides, table)
    }

    /// Ephemeris time (TDB seconds past J2000) of this instant.
    pub fn et(&self) -> EphemerisTime {
        jd_tt_to_et(self.jd_tt)
    }
}
