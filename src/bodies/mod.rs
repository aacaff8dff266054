//! Sun and Moon state providers plus the photometric quantities derived
//! from them (illumination, phase angle, crescent width).
//!
//! Two providers sit behind one trait: the DE442S kernel for the real
//! pipeline, the truncated Meeus series when no kernel is loaded. Both
//! produce geocentric GCRS positions in kilometers, so everything
//! downstream (frames, observer, visibility scoring) is provider-blind.

pub mod meeus;
pub mod phases;

use crate::constants::{
    Degree, JulianDate, Vec3, MOON_RADIUS_KM, NAIF_EARTH, NAIF_MOON, NAIF_SUN,
};
use crate::hilal_errors::HilalError;
use crate::math::{angular_separation, normalize_deg};
use crate::spk::SpkKernel;
use crate::time_scales::jd_tt_to_et;

/// Source of geocentric Sun/Moon positions at a TT Julian Date.
pub trait EphemerisProvider {
    /// Moon geocentric position, km, GCRS.
    fn moon_gcrs(&self, jd_tt: JulianDate) -> Result<Vec3, HilalError>;
    /// Sun geocentric position, km, GCRS.
    fn sun_gcrs(&self, jd_tt: JulianDate) -> Result<Vec3, HilalError>;
}

/// DE442S-backed provider.
pub struct SpkProvider<'a> {
    kernel: &'a SpkKernel,
}

impl<'a> SpkProvider<'a> {
    pub fn new(kernel: &'a SpkKernel) -> Self {
        SpkProvider { kernel }
    }
}

impl EphemerisProvider for SpkProvider<'_> {
    fn moon_gcrs(&self, jd_tt: JulianDate) -> Result<Vec3, HilalError> {
        let state = self.kernel.state(NAIF_MOON, NAIF_EARTH, jd_tt_to_et(jd_tt))?;
        Ok(state.position)
    }

    fn sun_gcrs(&self, jd_tt: JulianDate) -> Result<Vec3, HilalError> {
        let state = self.kernel.state(NAIF_SUN, NAIF_EARTH, jd_tt_to_et(jd_tt))?;
        Ok(state.position)
    }
}

/// Meeus-series provider; never fails.
pub struct MeeusProvider;

impl EphemerisProvider for MeeusProvider {
    fn moon_gcrs(&self, jd_tt: JulianDate) -> Result<Vec3, HilalError> {
        Ok(meeus::moon_gcrs_km(jd_tt))
    }

    fn sun_gcrs(&self, jd_tt: JulianDate) -> Result<Vec3, HilalError> {
        Ok(meeus::sun_gcrs_km(jd_tt))
    }
}

/// Right ascension and declination of a direction vector, degrees;
/// RA normalized to `[0, 360)`.
pub fn radec(v: &Vec3) -> (Degree, Degree) {
    let ra = normalize_deg(v.y.atan2(v.x).to_degrees());
    let dec = (v.z / v.norm()).asin().to_degrees();
    (ra, dec)
}

/// Photometric state of the Moon as seen from the Earth's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illumination {
    /// Sun-Moon elongation in degrees, `[0, 180]`.
    pub elongation: Degree,
    /// Phase angle at the Moon (Earth-Moon-Sun) in degrees.
    pub phase_angle: Degree,
    /// Illuminated fraction of the disk, `[0, 1]`.
    pub fraction: f64,
    /// True between new and full moon (Moon east of the Sun).
    pub is_waxing: bool,
    /// Position angle of the bright limb, degrees east of celestial north.
    pub bright_limb_angle: Degree,
}

/// Compute the illumination state from geocentric Sun and Moon vectors.
///
/// Arguments
/// ---------
/// * `moon`, `sun`: geocentric positions in km (any common frame with the
///   z-axis toward the north celestial pole).
///
/// Return
/// ------
/// * The [`Illumination`], or [`HilalError::ZeroVector`] for degenerate
///   input.
pub fn illumination(moon: &Vec3, sun: &Vec3) -> Result<Illumination, HilalError> {
    let elongation = angular_separation(moon, sun)?;

    // Phase angle: at the Moon, between the directions to the Earth and to
    // the Sun.
    let moon_to_earth = -moon;
    let moon_to_sun = sun - moon;
    let phase_angle = angular_separation(&moon_to_earth, &moon_to_sun)?;

    let fraction = (1.0 + phase_angle.to_radians().cos()) / 2.0;
    let is_waxing = sun.cross(moon).z > 0.0;

    // Meeus Eq. 48.5: position angle of the bright limb from the north
    // point of the disk, measured eastward.
    let (ra_sun, dec_sun) = radec(sun);
    let (ra_moon, dec_moon) = radec(moon);
    let delta_ra = (ra_sun - ra_moon).to_radians();
    let dec_sun = dec_sun.to_radians();
    let dec_moon = dec_moon.to_radians();
    let chi = (dec_sun.cos() * delta_ra.sin())
        .atan2(dec_sun.sin() * dec_moon.cos() - dec_sun.cos() * dec_moon.sin() * delta_ra.cos());

    Ok(Illumination {
        elongation,
        phase_angle,
        fraction,
        is_waxing,
        bright_limb_angle: normalize_deg(chi.to_degrees()),
    })
}

/// Topocentric crescent width in arc-minutes.
///
/// `W = SD * (1 - cos(ARCL))` with the semidiameter from the topocentric
/// distance. This is the width entering both the Yallop and Odeh
/// criteria (their W and W' coincide in this formulation).
///
/// Arguments
/// ---------
/// * `moon_topocentric_km`: observer-to-Moon vector, km.
/// * `arcl`: topocentric Sun-Moon elongation, degrees.
pub fn crescent_width_arcmin(moon_topocentric_km: &Vec3, arcl: Degree) -> f64 {
    let distance = moon_topocentric_km.norm();
    let semidiameter_arcmin = (MOON_RADIUS_KM / distance).atan().to_degrees() * 60.0;
    semidiameter_arcmin * (1.0 - arcl.to_radians().cos())
}
