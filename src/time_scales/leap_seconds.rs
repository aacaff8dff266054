//! TAI-UTC leap second table.
//!
//! The bundled table covers every leap second announced since 1972. An
//! optional NAIF LSK text kernel can replace it when the caller needs a
//! table newer than the crate (see [`crate::time_scales::lsk`]).

use crate::constants::JulianDate;
use crate::hilal_errors::HilalError;
use crate::time_scales::lsk::parse_lsk;

/// Leap seconds since 1972: `(UTC Julian Date the step takes effect, TAI-UTC in seconds)`.
const BUILTIN_DELTA_AT: [(JulianDate, f64); 28] = [
    (2_441_317.5, 10.0), // 1972 JAN 1
    (2_441_499.5, 11.0), // 1972 JUL 1
    (2_441_683.5, 12.0), // 1973 JAN 1
    (2_442_048.5, 13.0), // 1974 JAN 1
    (2_442_413.5, 14.0), // 1975 JAN 1
    (2_442_778.5, 15.0), // 1976 JAN 1
    (2_443_144.5, 16.0), // 1977 JAN 1
    (2_443_509.5, 17.0), // 1978 JAN 1
    (2_443_874.5, 18.0), // 1979 JAN 1
    (2_444_239.5, 19.0), // 1980 JAN 1
    (2_444_786.5, 20.0), // 1981 JUL 1
    (2_445_151.5, 21.0), // 1982 JUL 1
    (2_445_516.5, 22.0), // 1983 JUL 1
    (2_446_247.5, 23.0), // 1985 JUL 1
    (2_447_161.5, 24.0), // 1988 JAN 1
    (2_447_892.5, 25.0), // 1990 JAN 1
    (2_448_257.5, 26.0), // 1991 JAN 1
    (2_448_804.5, 27.0), // 1992 JUL 1
    (2_449_169.5, 28.0), // 1993 JUL 1
    (2_449_534.5, 29.0), // 1994 JUL 1
    (2_450_083.5, 30.0), // 1996 JAN 1
    (2_450_630.5, 31.0), // 1997 JUL 1
    (2_451_179.5, 32.0), // 1999 JAN 1
    (2_453_736.5, 33.0), // 2006 JAN 1
    (2_454_832.5, 34.0), // 2009 JAN 1
    (2_456_109.5, 35.0), // 2012 JUL 1
    (2_457_204.5, 36.0), // 2015 JUL 1
    (2_457_754.5, 37.0), // 2017 JAN 1
];

/// Value returned for queries before the first tabulated entry.
const PRE_1972_DELTA_AT: f64 = 10.0;

/// Ordered `(jd_utc_effective, TAI-UTC)` table with step-function lookup.
#[derive(Debug, Clone)]
pub struct LeapSecondTable {
    entries: Vec<(JulianDate, f64)>,
}

impl LeapSecondTable {
    /// Table bundled with the crate (complete through 2017 JAN 1, 37 s).
    pub fn builtin() -> Self {
        LeapSecondTable {
            entries: BUILTIN_DELTA_AT.to_vec(),
        }
    }

    /// Build a table from the text of a NAIF leap second kernel.
    ///
    /// Return
    /// ------
    /// * The parsed table, or [`HilalError::LskParse`] when the
    ///   `DELTET/DELTA_AT` assignment is missing or malformed.
    pub fn from_lsk(content: &str) -> Result<Self, HilalError> {
        let mut entries = parse_lsk(content)?;
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        if entries.is_empty() {
            return Err(HilalError::LskParse(
                "DELTET/DELTA_AT contains no entries".into(),
            ));
        }
        Ok(LeapSecondTable { entries })
    }

    /// TAI-UTC in seconds at a UTC Julian Date.
    ///
    /// Returns the value of the latest entry taking effect on or before
    /// `jd_utc`, and 10 s before the first entry (TAI-UTC was close to ten
    /// seconds when the stepped UTC system started in 1972).
    pub fn delta_at(&self, jd_utc: JulianDate) -> f64 {
        let mut value = PRE_1972_DELTA_AT;
        for &(effective, delta_at) in &self.entries {
            if effective <= jd_utc {
                value = delta_at;
            } else {
                break;
            }
        }
        value
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no entries (never the case for `builtin`).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LeapSecondTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod leap_seconds_test {
    use super::*;

    #[test]
    fn test_before_first_entry() {
        let table = LeapSecondTable::builtin();
        // 1970-01-01
        assert_eq!(table.delta_at(2_440_587.5), 10.0);
    }

    #[test]
    fn test_exact_boundary() {
        let table = LeapSecondTable::builtin();
        // The new value applies from the instant of the step.
        assert_eq!(table.delta_at(2_457_754.5), 37.0);
        assert_eq!(table.delta_at(2_457_754.5 - 1e-9), 36.0);
    }

    #[test]
    fn test_mid_table() {
        let table = LeapSecondTable::builtin();
        // 2000-01-01 falls in the 32 s era (1999 JAN 1 .. 2006 JAN 1).
        assert_eq!(table.delta_at(2_451_544.5), 32.0);
    }

    #[test]
    fn test_after_last_entry() {
        let table = LeapSecondTable::builtin();
        // 2025: no leap second has been announced since 2017.
        assert_eq!(table.delta_at(2_460_676.5), 37.0);
    }

    #[test]
    fn test_builtin_is_sorted_and_increasing() {
        let table = LeapSecondTable::builtin();
        for pair in table.entries.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert_eq!(pair[1].1 - pair[0].1, 1.0);
        }
    }
}
