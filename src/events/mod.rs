//! Rise, set and twilight events, and the post-sunset best observation
//! time.
//!
//! Events are found by scanning the airless altitude of the body at
//! 600-second steps over a 28-hour window from UTC midnight, then
//! refining each sign change with Brent to half a second. The scan keeps
//! polar cases honest: no crossing in the window simply yields `None`.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::bodies::{crescent_width_arcmin, EphemerisProvider};
use crate::constants::{Degree, EphemerisTime, Vec3, RISE_SET_ALTITUDE};
use crate::hilal_errors::HilalError;
use crate::math::root_finding::brent;
use crate::observers::geodesy::{ecef_to_enu, enu_to_az_alt};
use crate::observers::Observer;
use crate::time_scales::{LeapSecondTable, TimeScales};
use crate::visibility::arcv_min;

/// Scan step for the altitude search, seconds.
const SCAN_STEP: f64 = 600.0;
/// Search window from UTC midnight, hours.
const WINDOW_HOURS: f64 = 28.0;
/// Brent tolerance on event times, seconds.
const EVENT_TOLERANCE: f64 = 0.5;
/// Sample count of the optimized best-time search.
const BEST_TIME_SAMPLES: usize = 91;

/// Which body an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Sun,
    Moon,
}

/// Crossing direction of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Rising,
    Setting,
}

/// Sun and Moon horizon/twilight events for one civil date.
///
/// Any field can be `None`: circumpolar sites have days without a sunset,
/// and roughly one day per lunation has no moonset.
#[derive(Debug, Clone, PartialEq)]
pub struct SunMoonEvents {
    pub date: NaiveDate,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub civil_twilight_end: Option<DateTime<Utc>>,
    pub nautical_twilight_end: Option<DateTime<Utc>>,
    pub astronomical_twilight_end: Option<DateTime<Utc>>,
    pub moonrise: Option<DateTime<Utc>>,
    pub moonset: Option<DateTime<Utc>>,
}

/// Compute all seven events for `date` at `observer`.
///
/// Arguments
/// ---------
/// * `provider`: Sun/Moon ephemeris (kernel-backed or Meeus).
/// * `observer`: the site; its time overrides flow into every instant.
/// * `date`: civil UTC date; the window runs 28 hours from its midnight.
/// * `table`: leap second table.
pub fn sun_moon_events(
    provider: &dyn EphemerisProvider,
    observer: &Observer,
    date: NaiveDate,
    table: &LeapSecondTable,
) -> Result<SunMoonEvents, HilalError> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc();
    let overrides = observer.time_overrides();
    let ts0 = TimeScales::compute(midnight, &overrides, table);
    let et0 = ts0.et();
    let et1 = et0 + WINDOW_HOURS * 3600.0;

    let altitude = |body: Body, et: EphemerisTime| -> Result<Degree, HilalError> {
        let ts = TimeScales::from_et(et, &overrides, table);
        let position = match body {
            Body::Sun => provider.sun_gcrs(ts.jd_tt)?,
            Body::Moon => provider.moon_gcrs(ts.jd_tt)?,
        };
        Ok(observer.az_alt(&position, &ts, true).altitude)
    };

    let find = |body: Body, threshold: Degree, direction: Direction| -> Result<Option<DateTime<Utc>>, HilalError> {
        let root = first_crossing(&|et| altitude(body, et), et0, et1, threshold, direction)?;
        Ok(root.map(|et| TimeScales::from_et(et, &overrides, table).utc))
    };

    Ok(SunMoonEvents {
        date,
        sunrise: find(Body::Sun, RISE_SET_ALTITUDE, Direction::Rising)?,
        sunset: find(Body::Sun, RISE_SET_ALTITUDE, Direction::Setting)?,
        civil_twilight_end: find(Body::Sun, -6.0, Direction::Setting)?,
        nautical_twilight_end: find(Body::Sun, -12.0, Direction::Setting)?,
        astronomical_twilight_end: find(Body::Sun, -18.0, Direction::Setting)?,
        moonrise: find(Body::Moon, RISE_SET_ALTITUDE, Direction::Rising)?,
        moonset: find(Body::Moon, RISE_SET_ALTITUDE, Direction::Setting)?,
    })
}

/// First crossing of `altitude(et) - threshold` in the given direction.
fn first_crossing(
    altitude: &dyn Fn(EphemerisTime) -> Result<Degree, HilalError>,
    et0: EphemerisTime,
    et1: EphemerisTime,
    threshold: Degree,
    direction: Direction,
) -> Result<Option<EphemerisTime>, HilalError> {
    let f = |et: EphemerisTime| -> Result<f64, HilalError> { Ok(altitude(et)? - threshold) };

    let mut previous_et = et0;
    let mut previous_f = f(previous_et)?;

    let steps = ((et1 - et0) / SCAN_STEP).ceil() as usize;
    for i in 1..=steps {
        let et = (et0 + i as f64 * SCAN_STEP).min(et1);
        let value = f(et)?;

        let crossed = match direction {
            Direction::Rising => previous_f <= 0.0 && value > 0.0,
            Direction::Setting => previous_f >= 0.0 && value < 0.0,
        };
        if crossed {
            // Both bracket ends evaluated cleanly, and kernel coverage is
            // an interval, so the refinement cannot fail inside it.
            let root = brent(
                |x| f(x).unwrap_or(f64::NAN),
                previous_et,
                et,
                EVENT_TOLERANCE,
            );
            return Ok(root.or(Some(et)));
        }

        previous_et = et;
        previous_f = value;
    }

    Ok(None)
}

/// Best observation time, heuristic form: four ninths of the lag after
/// sunset. `None` when the Moon sets before the Sun.
pub fn best_time_heuristic(
    sunset: DateTime<Utc>,
    moonset: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if moonset <= sunset {
        return None;
    }
    let lag_seconds = (moonset - sunset).num_milliseconds() as f64 / 1000.0;
    Some(sunset + Duration::milliseconds((lag_seconds * 4.0 / 9.0 * 1000.0).round() as i64))
}

/// Best observation time, optimized form: the argmax of the Odeh test
/// value over 91 samples of `[sunset, moonset]`.
///
/// The observer's Earth-fixed position and ENU basis do not change over
/// the interval and are computed once; only the Earth-rotation dependent
/// transforms are re-evaluated per sample.
pub fn best_time_optimized(
    provider: &dyn EphemerisProvider,
    observer: &Observer,
    sunset: DateTime<Utc>,
    moonset: DateTime<Utc>,
    table: &LeapSecondTable,
) -> Result<Option<DateTime<Utc>>, HilalError> {
    if moonset <= sunset {
        return Ok(None);
    }

    let overrides = observer.time_overrides();
    let observer_itrs = observer.position_itrs_km();
    let latitude = observer.latitude.into_inner();
    let longitude = observer.longitude.into_inner();

    let span_ms = (moonset - sunset).num_milliseconds();
    let mut best: Option<(f64, DateTime<Utc>)> = None;

    for i in 0..BEST_TIME_SAMPLES {
        let offset_ms = span_ms * i as i64 / (BEST_TIME_SAMPLES as i64 - 1);
        let instant = sunset + Duration::milliseconds(offset_ms);
        let ts = TimeScales::compute(instant, &overrides, table);

        let moon = provider.moon_gcrs(ts.jd_tt)?;
        let sun = provider.sun_gcrs(ts.jd_tt)?;

        let altitude_of = |body_gcrs: &Vec3| -> Degree {
            let body_itrs = crate::frames::gcrs_to_itrs(body_gcrs, &ts, 0.0, 0.0);
            let enu = ecef_to_enu(&(body_itrs - observer_itrs), latitude, longitude);
            enu_to_az_alt(&enu).1
        };
        let arcv = altitude_of(&moon) - altitude_of(&sun);

        let observer_gcrs = crate::frames::itrs_to_gcrs(&observer_itrs, &ts, 0.0, 0.0);
        let moon_topocentric = moon - observer_gcrs;
        let sun_topocentric = sun - observer_gcrs;
        let arcl = crate::math::angular_separation(&moon_topocentric, &sun_topocentric)?;
        let width = crescent_width_arcmin(&moon_topocentric, arcl);

        let v = arcv - arcv_min(width);
        if best.map_or(true, |(best_v, _)| v > best_v) {
            best = Some((v, instant));
        }
    }

    Ok(best.map(|(_, instant)| instant))
}

#[cfg(test)]
mod events_test {
    use super::*;
    use crate::bodies::MeeusProvider;
    use chrono::{TimeZone, Timelike};

    fn london() -> Observer {
        Observer::new(51.5074, -0.1278, 10.0).unwrap()
    }

    #[test]
    fn test_london_equinox_sunset() {
        // 2025-03-29: sunset in London at 18:27 UTC give or take a minute.
        let table = LeapSecondTable::builtin();
        let events = sun_moon_events(
            &MeeusProvider,
            &london(),
            NaiveDate::from_ymd_opt(2025, 3, 29).unwrap(),
            &table,
        )
        .unwrap();

        let sunset = events.sunset.expect("London has a sunset in March");
        assert_eq!(sunset.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 29).unwrap());
        let minutes = sunset.hour() * 60 + sunset.minute();
        assert!(
            (18 * 60 + 20..=18 * 60 + 35).contains(&minutes),
            "sunset at {sunset}"
        );

        let sunrise = events.sunrise.expect("and a sunrise");
        assert!(sunrise < sunset);
    }

    #[test]
    fn test_twilight_ordering() {
        let table = LeapSecondTable::builtin();
        let events = sun_moon_events(
            &MeeusProvider,
            &london(),
            NaiveDate::from_ymd_opt(2025, 3, 29).unwrap(),
            &table,
        )
        .unwrap();

        let sunset = events.sunset.unwrap();
        let civil = events.civil_twilight_end.unwrap();
        let nautical = events.nautical_twilight_end.unwrap();
        let astronomical = events.astronomical_twilight_end.unwrap();
        assert!(sunset < civil);
        assert!(civil < nautical);
        assert!(nautical < astronomical);
    }

    #[test]
    fn test_polar_day_has_no_sunset() {
        // Longyearbyen in late June: the Sun never sets.
        let table = LeapSecondTable::builtin();
        let svalbard = Observer::new(78.2232, 15.6267, 10.0).unwrap();
        let events = sun_moon_events(
            &MeeusProvider,
            &svalbard,
            NaiveDate::from_ymd_opt(2025, 6, 21).unwrap(),
            &table,
        )
        .unwrap();

        assert!(events.sunset.is_none());
        assert!(events.sunrise.is_none());
        assert!(events.astronomical_twilight_end.is_none());
    }

    #[test]
    fn test_moonset_after_sunset_on_crescent_evening() {
        // 2025-03-30, the evening after the March new moon: the young
        // crescent sets after the Sun.
        let table = LeapSecondTable::builtin();
        let events = sun_moon_events(
            &MeeusProvider,
            &london(),
            NaiveDate::from_ymd_opt(2025, 3, 30).unwrap(),
            &table,
        )
        .unwrap();

        let sunset = events.sunset.unwrap();
        let moonset = events.moonset.unwrap();
        assert!(moonset > sunset, "moonset {moonset} sunset {sunset}");
        let lag_minutes = (moonset - sunset).num_minutes();
        assert!((10..180).contains(&lag_minutes), "lag {lag_minutes} min");
    }

    #[test]
    fn test_best_time_heuristic_fraction() {
        let sunset = Utc.with_ymd_and_hms(2025, 3, 29, 18, 27, 0).unwrap();
        let moonset = Utc.with_ymd_and_hms(2025, 3, 29, 19, 57, 0).unwrap();
        let best = best_time_heuristic(sunset, moonset).unwrap();
        // 4/9 of 90 minutes = 40 minutes.
        assert_eq!(best, Utc.with_ymd_and_hms(2025, 3, 29, 19, 7, 0).unwrap());

        assert!(best_time_heuristic(moonset, sunset).is_none());
    }

    #[test]
    fn test_best_time_optimized_inside_interval() {
        let table = LeapSecondTable::builtin();
        let sunset = Utc.with_ymd_and_hms(2025, 3, 30, 18, 29, 0).unwrap();
        let moonset = Utc.with_ymd_and_hms(2025, 3, 30, 20, 15, 0).unwrap();
        let best = best_time_optimized(&MeeusProvider, &london(), sunset, moonset, &table)
            .unwrap()
            .unwrap();
        assert!(best >= sunset && best <= moonset);
    }
}
