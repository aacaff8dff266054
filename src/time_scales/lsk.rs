//! NAIF Leapseconds Kernel (LSK) text parser.
//!
//! Only the `DELTET/DELTA_AT` assignment is extracted: a flat list of
//! `value, @YYYY-MON-DD` pairs. Every other line of the kernel is ignored,
//! so the parser accepts any LSK-shaped file NAIF publishes.

use crate::constants::JulianDate;
use crate::hilal_errors::HilalError;

/// Extract `(jd_utc_effective, delta_at)` pairs from LSK text.
///
/// The assignment looks like:
///
/// ```text
/// DELTET/DELTA_AT        = ( 10,   @1972-JAN-1
///                            11,   @1972-JUL-1
///                            ...
///                            37,   @2017-JAN-1 )
/// ```
///
/// Dates are converted to the UTC Julian Date of that midnight
/// (noon JD of the civil day minus 0.5).
pub fn parse_lsk(content: &str) -> Result<Vec<(JulianDate, f64)>, HilalError> {
    let start = content
        .find("DELTET/DELTA_AT")
        .ok_or_else(|| HilalError::LskParse("missing DELTET/DELTA_AT assignment".into()))?;
    let after_name = &content[start..];
    let open = after_name
        .find('(')
        .ok_or_else(|| HilalError::LskParse("DELTET/DELTA_AT has no opening parenthesis".into()))?;
    let close = after_name
        .find(')')
        .ok_or_else(|| HilalError::LskParse("DELTET/DELTA_AT has no closing parenthesis".into()))?;
    if close < open {
        return Err(HilalError::LskParse(
            "DELTET/DELTA_AT parentheses are unbalanced".into(),
        ));
    }

    let body = &after_name[open + 1..close];
    let mut pending_value: Option<f64> = None;
    let mut entries = Vec::new();

    for token in body.split([' ', ',', '\t', '\n', '\r']).filter(|t| !t.is_empty()) {
        if let Some(date) = token.strip_prefix('@') {
            let value = pending_value.take().ok_or_else(|| {
                HilalError::LskParse(format!("date @{date} is not preceded by a value"))
            })?;
            entries.push((naif_date_to_jd_utc(date)?, value));
        } else {
            // Fortran double-precision exponents appear in other DELTET
            // variables; accept them here too.
            let normalized = token.replace(['D', 'd'], "E");
            let value: f64 = normalized.parse().map_err(|_| {
                HilalError::LskParse(format!("cannot parse '{token}' as a number"))
            })?;
            pending_value = Some(value);
        }
    }

    if pending_value.is_some() {
        return Err(HilalError::LskParse(
            "trailing value without a @date in DELTET/DELTA_AT".into(),
        ));
    }

    Ok(entries)
}

/// Convert a NAIF `YYYY-MON-DD` literal to the UTC JD of that midnight.
fn naif_date_to_jd_utc(s: &str) -> Result<JulianDate, HilalError> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return Err(HilalError::LskParse(format!("bad date literal: @{s}")));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| HilalError::LskParse(format!("bad year in @{s}")))?;
    let month = month_from_abbrev(parts[1])
        .ok_or_else(|| HilalError::LskParse(format!("bad month in @{s}")))?;
    let day: i32 = parts[2]
        .parse()
        .map_err(|_| HilalError::LskParse(format!("bad day in @{s}")))?;

    // Fliegel-Van Flandern day number gives the JD at noon; midnight is
    // half a day earlier.
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    Ok(jdn as f64 - 0.5)
}

fn month_from_abbrev(abbrev: &str) -> Option<i32> {
    match abbrev.to_ascii_uppercase().as_str() {
        "JAN" => Some(1),
        "FEB" => Some(2),
        "MAR" => Some(3),
        "APR" => Some(4),
        "MAY" => Some(5),
        "JUN" => Some(6),
        "JUL" => Some(7),
        "AUG" => Some(8),
        "SEP" => Some(9),
        "OCT" => Some(10),
        "NOV" => Some(11),
        "DEC" => Some(12),
        _ => None,
    }
}
