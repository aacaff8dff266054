//! Ground observer: geodetic site parameters and the topocentric
//! azimuth/altitude pipeline.
//!
//! An [`Observer`] is immutable once constructed. Its coordinates are held
//! as [`NotNan`] so that a NaN smuggled in through a config file fails at
//! construction instead of surfacing as a NaN azimuth three layers later.

pub mod geodesy;
pub mod refraction;

pub use geodesy::{ecef_to_enu, ecef_to_geodetic, enu_basis, enu_to_az_alt, geodetic_to_ecef};
pub use refraction::{apply_refraction, bennett_refraction, remove_refraction};

use ordered_float::NotNan;

use crate::constants::{Degree, Meter, Vec3};
use crate::frames::{gcrs_to_itrs, itrs_to_gcrs};
use crate::hilal_errors::HilalError;
use crate::time_scales::{TimeOverrides, TimeScales};

/// Standard atmosphere pressure default, millibars.
pub const DEFAULT_PRESSURE: f64 = 1013.25;
/// Air temperature default, Celsius.
pub const DEFAULT_TEMPERATURE: f64 = 15.0;

/// Topocentric azimuth and altitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzAlt {
    /// Azimuth from north through east, `[0, 360)`.
    pub azimuth: Degree,
    /// Altitude above the horizon, `[-90, 90]`.
    pub altitude: Degree,
}

/// A ground observation site.
#[derive(Debug, PartialEq, Clone)]
pub struct Observer {
    /// Geodetic latitude in degrees, north positive.
    pub latitude: NotNan<f64>,
    /// Longitude in degrees, east positive.
    pub longitude: NotNan<f64>,
    /// Height above the WGS84 ellipsoid in meters.
    pub elevation: NotNan<f64>,
    /// TT - UT1 override in seconds.
    pub delta_t: Option<NotNan<f64>>,
    /// UT1 - UTC override in seconds; takes precedence over `delta_t`.
    pub ut1_utc: Option<NotNan<f64>>,
    /// Station pressure in millibars (refraction scaling).
    pub pressure: NotNan<f64>,
    /// Air temperature in Celsius (refraction scaling).
    pub temperature: NotNan<f64>,
}

impl Observer {
    /// Create an observer with default atmosphere and no time overrides.
    ///
    /// Arguments
    /// ---------
    /// * `latitude`: geodetic latitude in degrees, north positive.
    /// * `longitude`: degrees, east positive.
    /// * `elevation`: meters above the WGS84 ellipsoid.
    ///
    /// Return
    /// ------
    /// * The observer, or [`HilalError::InvalidObserver`] when any input
    ///   is NaN.
    pub fn new(latitude: Degree, longitude: Degree, elevation: Meter) -> Result<Observer, HilalError> {
        Ok(Observer {
            latitude: NotNan::new(latitude)?,
            longitude: NotNan::new(longitude)?,
            elevation: NotNan::new(elevation)?,
            delta_t: None,
            ut1_utc: None,
            pressure: NotNan::new(DEFAULT_PRESSURE)?,
            temperature: NotNan::new(DEFAULT_TEMPERATURE)?,
        })
    }

    /// Replace the atmosphere used for refraction.
    pub fn with_atmosphere(mut self, pressure: f64, temperature: f64) -> Result<Observer, HilalError> {
        self.pressure = NotNan::new(pressure)?;
        self.temperature = NotNan::new(temperature)?;
        Ok(self)
    }

    /// Set a TT - UT1 override in seconds.
    pub fn with_delta_t(mut self, delta_t: f64) -> Result<Observer, HilalError> {
        self.delta_t = Some(NotNan::new(delta_t)?);
        Ok(self)
    }

    /// Set a UT1 - UTC override in seconds (IERS Bulletin A).
    pub fn with_ut1_utc(mut self, ut1_utc: f64) -> Result<Observer, HilalError> {
        self.ut1_utc = Some(NotNan::new(ut1_utc)?);
        Ok(self)
    }

    /// The overrides to thread into [`TimeScales::compute`].
    pub fn time_overrides(&self) -> TimeOverrides {
        TimeOverrides {
            delta_t: self.delta_t.map(NotNan::into_inner),
            ut1_utc: self.ut1_utc.map(NotNan::into_inner),
        }
    }

    /// Site position in the Earth-fixed frame, kilometers.
    pub fn position_itrs_km(&self) -> Vec3 {
        geodetic_to_ecef(
            self.latitude.into_inner(),
            self.longitude.into_inner(),
            self.elevation.into_inner(),
        ) / 1000.0
    }

    /// Site position in the GCRS at an instant, kilometers.
    pub fn position_gcrs_km(&self, ts: &TimeScales) -> Vec3 {
        itrs_to_gcrs(&self.position_itrs_km(), ts, 0.0, 0.0)
    }

    /// Vector from the site to a body, in the GCRS, kilometers.
    ///
    /// This is the topocentric vector the crescent geometry (ARCL, W) is
    /// built from.
    pub fn topocentric_gcrs(&self, body_gcrs_km: &Vec3, ts: &TimeScales) -> Vec3 {
        body_gcrs_km - self.position_gcrs_km(ts)
    }

    /// Topocentric azimuth/altitude of a body.
    ///
    /// The pipeline: rotate the geocentric GCRS position into the ITRS,
    /// subtract the site, project the displacement on the local ENU basis,
    /// convert to angles, and (unless `airless`) lift the altitude by
    /// Bennett refraction.
    ///
    /// Arguments
    /// ---------
    /// * `body_gcrs_km`: geocentric body position, km, GCRS.
    /// * `ts`: time scales of the instant.
    /// * `airless`: `true` for the geometric altitude (event search and
    ///   ARCV use this), `false` for the apparent altitude reported to
    ///   users.
    pub fn az_alt(&self, body_gcrs_km: &Vec3, ts: &TimeScales, airless: bool) -> AzAlt {
        let body_itrs = gcrs_to_itrs(body_gcrs_km, ts, 0.0, 0.0);
        let delta = body_itrs - self.position_itrs_km();
        let enu = ecef_to_enu(
            &delta,
            self.latitude.into_inner(),
            self.longitude.into_inner(),
        );
        let (azimuth, mut altitude) = enu_to_az_alt(&enu);

        if !airless {
            altitude = apply_refraction(
                altitude,
                self.pressure.into_inner(),
                self.temperature.into_inner(),
            );
        }

        AzAlt { azimuth, altitude }
    }
}

#[cfg(test)]
mod observer_test {
    use super::*;
    use crate::time_scales::LeapSecondTable;
    use chrono::{TimeZone, Utc};

    fn sample_ts(observer: &Observer) -> TimeScales {
        TimeScales::compute(
            Utc.with_ymd_and_hms(2025, 3, 29, 18, 30, 0).unwrap(),
            &observer.time_overrides(),
            &LeapSecondTable::builtin(),
        )
    }

    #[test]
    fn test_constructor_rejects_nan() {
        assert!(Observer::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(Observer::new(0.0, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_defaults() {
        let obs = Observer::new(51.5074, -0.1278, 10.0).unwrap();
        assert_eq!(obs.pressure.into_inner(), 1013.25);
        assert_eq!(obs.temperature.into_inner(), 15.0);
        assert_eq!(obs.time_overrides(), crate::time_scales::TimeOverrides::default());
    }

    #[test]
    fn test_builders() {
        let obs = Observer::new(0.0, 0.0, 0.0)
            .unwrap()
            .with_atmosphere(900.0, -5.0)
            .unwrap()
            .with_ut1_utc(0.1)
            .unwrap();
        assert_eq!(obs.pressure.into_inner(), 900.0);
        assert_eq!(obs.time_overrides().ut1_utc, Some(0.1));
    }

    #[test]
    fn test_position_itrs_magnitude() {
        let obs = Observer::new(51.5074, -0.1278, 10.0).unwrap();
        let r = obs.position_itrs_km().norm();
        // Between the polar and equatorial radii.
        assert!(r > 6356.0 && r < 6379.0, "r = {r}");
    }

    #[test]
    fn test_position_gcrs_preserves_radius() {
        let obs = Observer::new(21.4225, 39.8262, 277.0).unwrap();
        let ts = sample_ts(&obs);
        let itrs = obs.position_itrs_km();
        let gcrs = obs.position_gcrs_km(&ts);
        assert!((itrs.norm() - gcrs.norm()).abs() < 1e-9);
    }

    #[test]
    fn test_az_alt_of_zenith_body() {
        // A body straight above the site (along the geodetic normal, far
        // away) must be near altitude 90.
        let obs = Observer::new(45.0, 7.0, 0.0).unwrap();
        let ts = sample_ts(&obs);

        let (_, _, up) = enu_basis(45.0, 7.0);
        let body_itrs = obs.position_itrs_km() + up * 100_000.0;
        let body_gcrs = itrs_to_gcrs(&body_itrs, &ts, 0.0, 0.0);

        let aa = obs.az_alt(&body_gcrs, &ts, true);
        assert!(aa.altitude > 89.9, "altitude = {}", aa.altitude);
    }

    #[test]
    fn test_airless_vs_apparent() {
        // Near the horizon the apparent altitude sits about half a degree
        // above the airless one.
        let obs = Observer::new(0.0, 0.0, 0.0).unwrap();
        let ts = sample_ts(&obs);

        let (east, _, up) = enu_basis(0.0, 0.0);
        // A direction just above the horizontal, far away.
        let body_itrs = obs.position_itrs_km() + (east * 100_000.0) + (up * 500.0);
        let body_gcrs = itrs_to_gcrs(&body_itrs, &ts, 0.0, 0.0);

        let airless = obs.az_alt(&body_gcrs, &ts, true);
        let apparent = obs.az_alt(&body_gcrs, &ts, false);
        assert_eq!(airless.azimuth, apparent.azimuth);
        let lift = apparent.altitude - airless.altitude;
        assert!(lift > 0.3 && lift < 0.7, "refraction lift = {lift}");
    }

    #[test]
    fn test_azimuth_range_invariant() {
        let obs = Observer::new(-33.8688, 151.2093, 58.0).unwrap();
        let ts = sample_ts(&obs);
        for i in 0..24 {
            let angle = (i as f64 * 15.0_f64).to_radians();
            let body = Vec3::new(300_000.0 * angle.cos(), 300_000.0 * angle.sin(), -5_000.0);
            let aa = obs.az_alt(&body, &ts, true);
            assert!((0.0..360.0).contains(&aa.azimuth));
            assert!((-90.0..=90.0).contains(&aa.altitude));
        }
    }
}
