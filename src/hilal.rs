//! Crescent sighting facade.
//!
//! A [`Hilal`] value owns the process state: the optional SPK kernel slot
//! and the leap second table. Queries borrow it immutably, so an
//! application can share one instance across worker threads; replacing
//! the kernel swaps an `Arc`, and in-flight queries finish on the kernel
//! they started with.
//!
//! Every query works without a kernel: the facade silently falls back to
//! the Meeus series provider and reports the source in the result, so
//! phase and rough-visibility calls never depend on a 120 MB download.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::bodies::phases::{nearest_full_moon, next_new_moon, previous_new_moon};
use crate::bodies::{
    illumination, EphemerisProvider, Illumination, MeeusProvider, SpkProvider,
};
use crate::constants::{Degree, JulianDate, Kilometer, Meter, SECONDS_PER_DAY, TT_MINUS_TAI};
use crate::events::{best_time_heuristic, best_time_optimized, sun_moon_events, SunMoonEvents};
use crate::hilal_errors::HilalError;
use crate::observers::Observer;
use crate::spk::SpkKernel;
use crate::time_scales::{jd_to_date, LeapSecondTable, TimeOverrides, TimeScales};
use crate::visibility::{
    assemble_geometry, odeh_score, yallop_score, CrescentGeometry, OdehResult, YallopResult,
};

/// Where the active kernel's bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSource {
    /// Read from a file by the caller.
    File(PathBuf),
    /// Handed over as an in-memory buffer.
    Buffer,
    /// Downloaded from a URL by the caller.
    Url(String),
}

/// Which ephemeris produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemerisSource {
    /// The loaded DE442S SPK kernel.
    De442s,
    /// The truncated Meeus series (kernel-free fallback).
    Meeus,
}

impl std::fmt::Display for EphemerisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EphemerisSource::De442s => write!(f, "DE442S"),
            EphemerisSource::Meeus => write!(f, "Meeus approximation"),
        }
    }
}

/// How the best observation time is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BestTimeMethod {
    /// Sunset plus four ninths of the lag.
    #[default]
    Heuristic,
    /// Argmax of the Odeh test value over the sunset-moonset interval.
    Optimized,
}

/// Options of [`Hilal::sighting_report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SightingOptions {
    pub best_time_method: BestTimeMethod,
}

/// The eight common phase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoonPhase::NewMoon => "new-moon",
            MoonPhase::WaxingCrescent => "waxing-crescent",
            MoonPhase::FirstQuarter => "first-quarter",
            MoonPhase::WaxingGibbous => "waxing-gibbous",
            MoonPhase::FullMoon => "full-moon",
            MoonPhase::WaningGibbous => "waning-gibbous",
            MoonPhase::LastQuarter => "last-quarter",
            MoonPhase::WaningCrescent => "waning-crescent",
        };
        write!(f, "{name}")
    }
}

/// Result of the kernel-free [`Hilal::moon_phase`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoonPhaseResult {
    pub at: DateTime<Utc>,
    pub phase: MoonPhase,
    /// Position in the lunation, `[0, 1)`: 0 = new, 0.5 = full.
    pub phase_fraction: f64,
    /// Days since the last new moon.
    pub age_days: f64,
    /// Illuminated fraction of the disk, `[0, 1]`.
    pub illumination: f64,
    /// Sun-Moon elongation, degrees.
    pub elongation: Degree,
    pub is_waxing: bool,
    pub previous_new_moon: DateTime<Utc>,
    pub next_new_moon: DateTime<Utc>,
    pub nearest_full_moon: DateTime<Utc>,
}

/// Result of the kernel-free [`Hilal::moon_position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    pub at: DateTime<Utc>,
    /// Apparent (refraction-applied) azimuth, degrees.
    pub azimuth: Degree,
    /// Apparent altitude, degrees.
    pub altitude: Degree,
    /// Topocentric distance, km.
    pub distance_km: Kilometer,
    /// Geocentric right ascension, degrees.
    pub right_ascension: Degree,
    /// Geocentric declination, degrees.
    pub declination: Degree,
}

/// Kernel-free crescent visibility estimate at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEstimate {
    pub at: DateTime<Utc>,
    pub arcv: Degree,
    pub arcl: Degree,
    pub daz: Degree,
    pub width_arcmin: f64,
    pub moon_altitude: Degree,
    pub sun_altitude: Degree,
    pub yallop: YallopResult,
    pub odeh: OdehResult,
}

/// Complete answer to one `(date, observer)` sighting query.
///
/// `date`, `observer` and `ephemeris_source` are always present; the
/// remaining fields are `None` when the day has no sunset, no moonset, or
/// the Moon sets first (no crescent window).
#[derive(Debug, Clone, PartialEq)]
pub struct MoonSightingReport {
    pub date: NaiveDate,
    pub observer: Observer,
    pub ephemeris_source: EphemerisSource,
    pub events: SunMoonEvents,
    pub best_time: Option<DateTime<Utc>>,
    /// Twenty minutes either side of the best time.
    pub observation_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub geometry: Option<CrescentGeometry>,
    pub yallop: Option<YallopResult>,
    pub odeh: Option<OdehResult>,
    pub moon_position: Option<MoonPosition>,
    pub illumination: Option<Illumination>,
    pub sighting_possible: bool,
}

/// Half-width of the reported observation window.
const OBSERVATION_WINDOW_MINUTES: i64 = 20;

/// The facade state: kernel slot plus leap second table.
pub struct Hilal {
    kernel: Option<Arc<SpkKernel>>,
    kernel_source: Option<KernelSource>,
    leap_seconds: LeapSecondTable,
}

impl Hilal {
    /// Facade with the bundled leap second table and no kernel.
    pub fn new() -> Hilal {
        Hilal {
            kernel: None,
            kernel_source: None,
            leap_seconds: LeapSecondTable::builtin(),
        }
    }

    /// Facade using a caller-supplied NAIF LSK text kernel.
    pub fn with_leap_second_kernel(lsk_text: &str) -> Result<Hilal, HilalError> {
        Ok(Hilal {
            kernel: None,
            kernel_source: None,
            leap_seconds: LeapSecondTable::from_lsk(lsk_text)?,
        })
    }

    /// Parse kernel bytes and install them as the active kernel.
    ///
    /// Replacing the kernel is safe while other threads hold clones of the
    /// previous `Arc`: they keep reading the old kernel.
    pub fn init_kernel(&mut self, buffer: Vec<u8>, source: KernelSource) -> Result<(), HilalError> {
        let kernel = SpkKernel::parse(buffer)?;
        self.kernel = Some(Arc::new(kernel));
        self.kernel_source = Some(source);
        Ok(())
    }

    /// The active kernel, if one is loaded.
    pub fn kernel(&self) -> Option<Arc<SpkKernel>> {
        self.kernel.clone()
    }

    /// Where the active kernel came from.
    pub fn kernel_source(&self) -> Option<&KernelSource> {
        self.kernel_source.as_ref()
    }

    /// The ephemeris the next query will use.
    pub fn ephemeris_source(&self) -> EphemerisSource {
        if self.kernel.is_some() {
            EphemerisSource::De442s
        } else {
            EphemerisSource::Meeus
        }
    }

    /// The leap second table in use.
    pub fn leap_seconds(&self) -> &LeapSecondTable {
        &self.leap_seconds
    }

    fn with_provider<T>(&self, f: impl FnOnce(&dyn EphemerisProvider) -> T) -> T {
        match &self.kernel {
            Some(kernel) => f(&SpkProvider::new(kernel)),
            None => f(&MeeusProvider),
        }
    }

    /// Convert a TT Julian Date (e.g. a lunation instant) to civil UTC.
    fn jd_tt_to_utc(&self, jd_tt: JulianDate) -> DateTime<Utc> {
        let delta_at = self.leap_seconds.delta_at(jd_tt);
        jd_to_date(jd_tt - (delta_at + TT_MINUS_TAI) / SECONDS_PER_DAY)
    }

    /// Sun/Moon rise, set and twilight events for a civil date.
    pub fn sun_moon_events(
        &self,
        date: NaiveDate,
        observer: &Observer,
    ) -> Result<SunMoonEvents, HilalError> {
        self.with_provider(|provider| {
            sun_moon_events(provider, observer, date, &self.leap_seconds)
        })
    }

    /// The full sighting pipeline for one evening.
    ///
    /// Never fails for astronomical reasons: a missing sunset or moonset
    /// yields a partial report with `sighting_possible = false`.
    pub fn sighting_report(
        &self,
        date: NaiveDate,
        observer: &Observer,
        options: &SightingOptions,
    ) -> Result<MoonSightingReport, HilalError> {
        self.with_provider(|provider| {
            let events = sun_moon_events(provider, observer, date, &self.leap_seconds)?;

            let best_time = match (events.sunset, events.moonset) {
                (Some(sunset), Some(moonset)) => match options.best_time_method {
                    BestTimeMethod::Heuristic => best_time_heuristic(sunset, moonset),
                    BestTimeMethod::Optimized => best_time_optimized(
                        provider,
                        observer,
                        sunset,
                        moonset,
                        &self.leap_seconds,
                    )?,
                },
                _ => None,
            };

            let mut report = MoonSightingReport {
                date,
                observer: observer.clone(),
                ephemeris_source: self.ephemeris_source(),
                events,
                best_time,
                observation_window: None,
                geometry: None,
                yallop: None,
                odeh: None,
                moon_position: None,
                illumination: None,
                sighting_possible: false,
            };

            let Some(best) = best_time else {
                return Ok(report);
            };
            // best_time exists only when both sunset and moonset do.
            let sunset = report.events.sunset.expect("sunset exists at best time");
            let moonset = report.events.moonset.expect("moonset exists at best time");
            let lag_minutes = (moonset - sunset).num_milliseconds() as f64 / 60_000.0;

            let ts = TimeScales::compute(best, &observer.time_overrides(), &self.leap_seconds);
            let moon = provider.moon_gcrs(ts.jd_tt)?;
            let sun = provider.sun_gcrs(ts.jd_tt)?;

            let moon_airless = observer.az_alt(&moon, &ts, true);
            let sun_airless = observer.az_alt(&sun, &ts, true);
            let moon_apparent = observer.az_alt(&moon, &ts, false);

            let moon_topocentric = observer.topocentric_gcrs(&moon, &ts);
            let sun_topocentric = observer.topocentric_gcrs(&sun, &ts);

            let geometry = assemble_geometry(
                &moon_airless,
                &sun_airless,
                &moon_topocentric,
                &sun_topocentric,
                lag_minutes,
            )?;

            let (ra, dec) = crate::bodies::radec(&moon);
            let window = Duration::minutes(OBSERVATION_WINDOW_MINUTES);

            report.observation_window = Some((best - window, best + window));
            report.yallop = Some(yallop_score(geometry.arcv, geometry.width_arcmin));
            report.odeh = Some(odeh_score(geometry.arcv, geometry.width_arcmin));
            report.moon_position = Some(MoonPosition {
                at: best,
                azimuth: moon_apparent.azimuth,
                altitude: moon_apparent.altitude,
                distance_km: moon_topocentric.norm(),
                right_ascension: ra,
                declination: dec,
            });
            report.illumination = Some(illumination(&moon, &sun)?);
            report.geometry = Some(geometry);
            report.sighting_possible = true;

            Ok(report)
        })
    }

    /// Current phase of the Moon (kernel-free; never fails).
    pub fn moon_phase(&self, at: DateTime<Utc>) -> MoonPhaseResult {
        let ts = TimeScales::compute(at, &TimeOverrides::default(), &self.leap_seconds);

        let moon = crate::bodies::meeus::moon_gcrs_km(ts.jd_tt);
        let sun = crate::bodies::meeus::sun_gcrs_km(ts.jd_tt);
        let ill = illumination(&moon, &sun)
            .expect("Meeus positions are never zero vectors");

        let previous = previous_new_moon(ts.jd_tt);
        let next = next_new_moon(ts.jd_tt);
        let full = nearest_full_moon(ts.jd_tt);
        let phase_fraction = ((ts.jd_tt - previous) / (next - previous)).clamp(0.0, 1.0 - 1e-12);

        MoonPhaseResult {
            at,
            phase: phase_from_fraction(phase_fraction),
            phase_fraction,
            age_days: ts.jd_tt - previous,
            illumination: ill.fraction,
            elongation: ill.elongation,
            is_waxing: ill.is_waxing,
            previous_new_moon: self.jd_tt_to_utc(previous),
            next_new_moon: self.jd_tt_to_utc(next),
            nearest_full_moon: self.jd_tt_to_utc(full),
        }
    }

    /// Topocentric Moon position from the Meeus series (kernel-free).
    pub fn moon_position(
        &self,
        at: DateTime<Utc>,
        latitude: Degree,
        longitude: Degree,
        elevation: Meter,
    ) -> Result<MoonPosition, HilalError> {
        let observer = Observer::new(latitude, longitude, elevation)?;
        let ts = TimeScales::compute(at, &observer.time_overrides(), &self.leap_seconds);

        let moon = crate::bodies::meeus::moon_gcrs_km(ts.jd_tt);
        let apparent = observer.az_alt(&moon, &ts, false);
        let topocentric = observer.topocentric_gcrs(&moon, &ts);
        let (ra, dec) = crate::bodies::radec(&moon);

        Ok(MoonPosition {
            at,
            azimuth: apparent.azimuth,
            altitude: apparent.altitude,
            distance_km: topocentric.norm(),
            right_ascension: ra,
            declination: dec,
        })
    }

    /// Geocentric illumination state from the Meeus series (kernel-free).
    pub fn moon_illumination(&self, at: DateTime<Utc>) -> Illumination {
        let ts = TimeScales::compute(at, &TimeOverrides::default(), &self.leap_seconds);
        let moon = crate::bodies::meeus::moon_gcrs_km(ts.jd_tt);
        let sun = crate::bodies::meeus::sun_gcrs_km(ts.jd_tt);
        illumination(&moon, &sun).expect("Meeus positions are never zero vectors")
    }

    /// Crescent visibility estimate at one instant from the Meeus series
    /// (kernel-free).
    pub fn moon_visibility_estimate(
        &self,
        at: DateTime<Utc>,
        latitude: Degree,
        longitude: Degree,
    ) -> Result<VisibilityEstimate, HilalError> {
        let observer = Observer::new(latitude, longitude, 0.0)?;
        let ts = TimeScales::compute(at, &observer.time_overrides(), &self.leap_seconds);

        let moon = crate::bodies::meeus::moon_gcrs_km(ts.jd_tt);
        let sun = crate::bodies::meeus::sun_gcrs_km(ts.jd_tt);

        let moon_airless = observer.az_alt(&moon, &ts, true);
        let sun_airless = observer.az_alt(&sun, &ts, true);
        let moon_topocentric = observer.topocentric_gcrs(&moon, &ts);
        let sun_topocentric = observer.topocentric_gcrs(&sun, &ts);

        let arcl = crate::math::angular_separation(&moon_topocentric, &sun_topocentric)?;
        let arcv = moon_airless.altitude - sun_airless.altitude;
        let daz = crate::math::normalize_deg_signed(sun_airless.azimuth - moon_airless.azimuth);
        let width = crate::bodies::crescent_width_arcmin(&moon_topocentric, arcl);

        Ok(VisibilityEstimate {
            at,
            arcv,
            arcl,
            daz,
            width_arcmin: width,
            moon_altitude: moon_airless.altitude,
            sun_altitude: sun_airless.altitude,
            yallop: yallop_score(arcv, width),
            odeh: odeh_score(arcv, width),
        })
    }
}

impl Default for Hilal {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a lunation fraction to the eight phase names; the quarter phases
/// get a 1/16-lunation window either side.
fn phase_from_fraction(fraction: f64) -> MoonPhase {
    match fraction {
        f if f < 0.03125 => MoonPhase::NewMoon,
        f if f < 0.21875 => MoonPhase::WaxingCrescent,
        f if f < 0.28125 => MoonPhase::FirstQuarter,
        f if f < 0.46875 => MoonPhase::WaxingGibbous,
        f if f < 0.53125 => MoonPhase::FullMoon,
        f if f < 0.71875 => MoonPhase::WaningGibbous,
        f if f < 0.78125 => MoonPhase::LastQuarter,
        f if f < 0.96875 => MoonPhase::WaningCrescent,
        _ => MoonPhase::NewMoon,
    }
}
